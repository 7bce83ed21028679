//! Named form inputs and their conversion into a [`ServiceConfig`].
//!
//! Text inputs hold exactly what the user typed. Nothing is parsed until
//! [`ConfigForm::collect`], which mirrors reading the whole form on save.

use crate::ServiceConfig;
use std::str::FromStr;
use thiserror::Error;

/// Inputs that mean "not set" for an optional field.
const UNSET_SENTINELS: &[&str] = &["none", "None", "null"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be on or off, got {value:?}")]
    NotAToggle { field: &'static str, value: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigForm {
    pub model: String,
    pub served_model_name: String,
    pub host: String,
    pub port: String,
    pub max_num_seqs: String,
    pub max_num_batched_tokens: String,
    pub gpu_memory_utilization: String,
    pub max_model_len: String,
    pub tensor_parallel_size: String,
    pub dtype: String,
    pub kv_cache_dtype: String,
    pub quantization: String,
    pub load_format: String,
    pub trust_remote_code: bool,
    pub enable_prefix_caching: bool,
    pub enable_chunked_prefill: bool,
    pub tokenizer: String,
    pub chat_template: String,
    pub revision: String,
    pub download_dir: String,
    pub enable_lora: bool,
    pub max_loras: String,
    pub max_lora_rank: String,
    pub lora_modules: String,
}

impl ConfigForm {
    /// Pre-fill every input from a stored configuration.
    pub fn from_config(config: &ServiceConfig) -> Self {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }
        fn number<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(T::to_string).unwrap_or_default()
        }

        Self {
            model: config.model.clone(),
            served_model_name: text(&config.served_model_name),
            host: config.host.clone(),
            port: config.port.to_string(),
            max_num_seqs: config.max_num_seqs.to_string(),
            max_num_batched_tokens: number(&config.max_num_batched_tokens),
            gpu_memory_utilization: config.gpu_memory_utilization.to_string(),
            max_model_len: config.max_model_len.to_string(),
            tensor_parallel_size: config.tensor_parallel_size.to_string(),
            dtype: config.dtype.clone(),
            kv_cache_dtype: text(&config.kv_cache_dtype),
            quantization: text(&config.quantization),
            load_format: text(&config.load_format),
            trust_remote_code: config.trust_remote_code,
            enable_prefix_caching: config.enable_prefix_caching,
            enable_chunked_prefill: config.enable_chunked_prefill,
            tokenizer: text(&config.tokenizer),
            chat_template: text(&config.chat_template),
            revision: text(&config.revision),
            download_dir: text(&config.download_dir),
            enable_lora: config.enable_lora,
            max_loras: number(&config.max_loras),
            max_lora_rank: number(&config.max_lora_rank),
            lora_modules: text(&config.lora_modules),
        }
    }

    /// Read every recognized input into a config.
    pub fn collect(&self) -> Result<ServiceConfig, FormError> {
        Ok(ServiceConfig {
            model: required_text("model", &self.model)?,
            served_model_name: optional_text(&self.served_model_name),
            host: required_text("host", &self.host)?,
            port: required_number("port", &self.port)?,
            max_num_seqs: required_number("max_num_seqs", &self.max_num_seqs)?,
            max_num_batched_tokens: optional_number(
                "max_num_batched_tokens",
                &self.max_num_batched_tokens,
            )?,
            gpu_memory_utilization: required_number(
                "gpu_memory_utilization",
                &self.gpu_memory_utilization,
            )?,
            max_model_len: required_number("max_model_len", &self.max_model_len)?,
            tensor_parallel_size: required_number(
                "tensor_parallel_size",
                &self.tensor_parallel_size,
            )?,
            dtype: required_text("dtype", &self.dtype)?,
            kv_cache_dtype: optional_text(&self.kv_cache_dtype),
            quantization: optional_text(&self.quantization),
            load_format: optional_text(&self.load_format),
            trust_remote_code: self.trust_remote_code,
            enable_prefix_caching: self.enable_prefix_caching,
            enable_chunked_prefill: self.enable_chunked_prefill,
            tokenizer: optional_text(&self.tokenizer),
            chat_template: optional_text(&self.chat_template),
            revision: optional_text(&self.revision),
            download_dir: optional_text(&self.download_dir),
            enable_lora: self.enable_lora,
            max_loras: optional_number("max_loras", &self.max_loras)?,
            max_lora_rank: optional_number("max_lora_rank", &self.max_lora_rank)?,
            lora_modules: optional_text(&self.lora_modules),
        })
    }

    /// Type into one input by its config key. Toggles take on/off style values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        let value = value.to_string();
        match key {
            "model" => self.model = value,
            "served_model_name" => self.served_model_name = value,
            "host" => self.host = value,
            "port" => self.port = value,
            "max_num_seqs" => self.max_num_seqs = value,
            "max_num_batched_tokens" => self.max_num_batched_tokens = value,
            "gpu_memory_utilization" => self.gpu_memory_utilization = value,
            "max_model_len" => self.max_model_len = value,
            "tensor_parallel_size" => self.tensor_parallel_size = value,
            "dtype" => self.dtype = value,
            "kv_cache_dtype" => self.kv_cache_dtype = value,
            "quantization" => self.quantization = value,
            "load_format" => self.load_format = value,
            "trust_remote_code" => self.trust_remote_code = toggle("trust_remote_code", &value)?,
            "enable_prefix_caching" => {
                self.enable_prefix_caching = toggle("enable_prefix_caching", &value)?
            }
            "enable_chunked_prefill" => {
                self.enable_chunked_prefill = toggle("enable_chunked_prefill", &value)?
            }
            "tokenizer" => self.tokenizer = value,
            "chat_template" => self.chat_template = value,
            "revision" => self.revision = value,
            "download_dir" => self.download_dir = value,
            "enable_lora" => self.enable_lora = toggle("enable_lora", &value)?,
            "max_loras" => self.max_loras = value,
            "max_lora_rank" => self.max_lora_rank = value,
            "lora_modules" => self.lora_modules = value,
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Every input as `(key, shown value)`, in form order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        fn flag(on: bool) -> String {
            let shown = if on { "on" } else { "off" };
            shown.to_string()
        }

        vec![
            ("model", self.model.clone()),
            ("served_model_name", self.served_model_name.clone()),
            ("host", self.host.clone()),
            ("port", self.port.clone()),
            ("max_num_seqs", self.max_num_seqs.clone()),
            ("max_num_batched_tokens", self.max_num_batched_tokens.clone()),
            ("gpu_memory_utilization", self.gpu_memory_utilization.clone()),
            ("max_model_len", self.max_model_len.clone()),
            ("tensor_parallel_size", self.tensor_parallel_size.clone()),
            ("dtype", self.dtype.clone()),
            ("kv_cache_dtype", self.kv_cache_dtype.clone()),
            ("quantization", self.quantization.clone()),
            ("load_format", self.load_format.clone()),
            ("trust_remote_code", flag(self.trust_remote_code)),
            ("enable_prefix_caching", flag(self.enable_prefix_caching)),
            ("enable_chunked_prefill", flag(self.enable_chunked_prefill)),
            ("tokenizer", self.tokenizer.clone()),
            ("chat_template", self.chat_template.clone()),
            ("revision", self.revision.clone()),
            ("download_dir", self.download_dir.clone()),
            ("enable_lora", flag(self.enable_lora)),
            ("max_loras", self.max_loras.clone()),
            ("max_lora_rank", self.max_lora_rank.clone()),
            ("lora_modules", self.lora_modules.clone()),
        ]
    }

    /// Port the service is configured for, if the input holds a valid one.
    pub fn port(&self) -> Option<u16> {
        self.port.trim().parse().ok()
    }
}

/// Blank, or one of the placeholders the backend and launcher treat as unset.
pub(crate) fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || UNSET_SENTINELS.contains(&value)
}

fn required_text(field: &'static str, value: &str) -> Result<String, FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing { field });
    }
    Ok(value.trim().to_string())
}

fn optional_text(value: &str) -> Option<String> {
    if is_unset(value) {
        return None;
    }
    Some(value.trim().to_string())
}

fn required_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing { field });
    }
    value.trim().parse().map_err(|_| FormError::NotANumber {
        field,
        value: value.to_string(),
    })
}

fn optional_number<T: FromStr>(field: &'static str, value: &str) -> Result<Option<T>, FormError> {
    if is_unset(value) {
        return Ok(None);
    }
    required_number(field, value).map(Some)
}

fn toggle(field: &'static str, value: &str) -> Result<bool, FormError> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(FormError::NotAToggle {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ConfigForm {
        ConfigForm::from_config(&ServiceConfig::default())
    }

    #[test]
    fn test_prefilled_form_collects_back_to_defaults() {
        assert_eq!(defaults().collect().unwrap(), ServiceConfig::default());
    }

    #[test]
    fn test_empty_optional_inputs_are_omitted() {
        let mut form = defaults();
        form.quantization = String::new();
        form.tokenizer = "   ".to_string();
        form.max_loras = "None".to_string();
        form.kv_cache_dtype = "null".to_string();

        let value = serde_json::to_value(form.collect().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["quantization", "tokenizer", "max_loras", "kv_cache_dtype"] {
            assert!(!obj.contains_key(key), "{key} should be omitted");
        }
    }

    #[test]
    fn test_filled_optional_inputs_are_typed() {
        let mut form = defaults();
        form.quantization = "awq".to_string();
        form.max_num_batched_tokens = "4096".to_string();
        form.max_lora_rank = " 16 ".to_string();
        form.enable_lora = true;

        let value = serde_json::to_value(form.collect().unwrap()).unwrap();
        assert_eq!(value["quantization"], "awq");
        assert_eq!(value["max_num_batched_tokens"], 4096);
        assert_eq!(value["max_lora_rank"], 16);
        assert_eq!(value["enable_lora"], true);
    }

    #[test]
    fn test_numeric_fields_are_parsed() {
        let mut form = defaults();
        form.port = "8000".to_string();
        form.gpu_memory_utilization = "0.85".to_string();

        let config = form.collect().unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.gpu_memory_utilization, 0.85);
    }

    #[test]
    fn test_bad_number_names_the_field() {
        let mut form = defaults();
        form.max_model_len = "lots".to_string();
        assert_eq!(
            form.collect().unwrap_err(),
            FormError::NotANumber {
                field: "max_model_len",
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_required_field_missing() {
        let mut form = defaults();
        form.model = String::new();
        assert_eq!(form.collect().unwrap_err(), FormError::Missing { field: "model" });
    }

    #[test]
    fn test_set_by_key() {
        let mut form = defaults();
        form.set("port", "8001").unwrap();
        form.set("enable_prefix_caching", "on").unwrap();
        assert_eq!(form.port(), Some(8001));
        assert!(form.enable_prefix_caching);
        assert_eq!(
            form.set("enable_lora", "maybe").unwrap_err(),
            FormError::NotAToggle {
                field: "enable_lora",
                value: "maybe".to_string()
            }
        );
        assert!(matches!(form.set("colour", "red"), Err(FormError::UnknownField(_))));
    }

    #[test]
    fn test_fields_cover_every_key() {
        let form = defaults();
        let mut probe = form.clone();
        for (key, value) in form.fields() {
            probe.set(key, &value).unwrap();
        }
        assert_eq!(probe, form);
    }
}
