use crate::form::is_unset;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Settings the form edits. Optional keys are left out of the JSON entirely
/// when unset so the backend keeps whatever it already has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_model_name: Option<String>,
    pub host: String,
    pub port: u16,

    // Scheduling and batching
    pub max_num_seqs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_batched_tokens: Option<u32>,
    pub gpu_memory_utilization: f64,
    pub max_model_len: u32,
    pub tensor_parallel_size: u32,

    // Data types
    pub dtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv_cache_dtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_format: Option<String>,

    // Feature toggles
    #[serde(default)]
    pub trust_remote_code: bool,
    #[serde(default)]
    pub enable_prefix_caching: bool,
    #[serde(default)]
    pub enable_chunked_prefill: bool,

    // Tokenizer and weights overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,

    // LoRA
    #[serde(default)]
    pub enable_lora: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loras: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lora_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora_modules: Option<String>,
}

/// Factory settings, the same ones `reset-config` writes on the backend.
impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: "HuggingFaceTB/SmolLM3-3B".to_string(),
            served_model_name: None,
            host: "0.0.0.0".to_string(),
            port: 5002,
            max_num_seqs: 32,
            max_num_batched_tokens: None,
            gpu_memory_utilization: 0.7,
            max_model_len: 8192,
            tensor_parallel_size: 1,
            dtype: "auto".to_string(),
            kv_cache_dtype: None,
            quantization: None,
            load_format: None,
            trust_remote_code: false,
            enable_prefix_caching: false,
            enable_chunked_prefill: false,
            tokenizer: None,
            chat_template: None,
            revision: None,
            download_dir: None,
            enable_lora: false,
            max_loras: None,
            max_lora_rank: None,
            lora_modules: None,
        }
    }
}

impl ServiceConfig {
    /// Read the typed view out of a stored config, filling keys it lacks
    /// from the factory defaults. Null, blank and placeholder strings such as
    /// `"None"` count as unset. Fails only on a present key of the wrong type.
    pub fn from_raw(raw: &RawConfig) -> Result<Self, serde_json::Error> {
        let mut merged = object(serde_json::to_value(Self::default())?);
        if let Value::Object(stored) = &raw.0 {
            for (key, value) in stored {
                let unset = match value {
                    Value::Null => true,
                    Value::String(s) => is_unset(s),
                    _ => false,
                };
                if !unset {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        serde_json::from_value(Value::Object(merged))
    }

    pub fn to_raw(&self) -> Result<RawConfig, serde_json::Error> {
        Ok(RawConfig(serde_json::to_value(self)?))
    }

    /// Body for `update-config`. The backend merges it into what it has, so an
    /// optional key set in `previous` but cleared here is sent as `null`.
    pub fn update_body(&self, previous: Option<&ServiceConfig>) -> Result<RawConfig, serde_json::Error> {
        let mut body = object(serde_json::to_value(self)?);
        if let Some(previous) = previous {
            for key in object(serde_json::to_value(previous)?).keys() {
                if !body.contains_key(key) {
                    body.insert(key.clone(), Value::Null);
                }
            }
        }
        Ok(RawConfig(Value::Object(body)))
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(Debug, Error)]
#[error("Invalid JSON format: {0}")]
pub struct InvalidJson(#[from] pub serde_json::Error);

/// The config as the raw JSON editor holds it: whatever the backend stored,
/// unknown keys and key order included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(pub Value);

impl RawConfig {
    /// Only JSON syntax is checked; the backend owns the schema.
    pub fn parse(text: &str) -> Result<Self, InvalidJson> {
        Ok(Self(serde_json::from_str(text)?))
    }

    /// Pretty-printed with two-space indentation for hand editing.
    pub fn to_editor_text(&self) -> String {
        format!("{:#}", self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn port(&self) -> Option<u16> {
        self.get("port")
            .and_then(Value::as_u64)
            .and_then(|p| u16::try_from(p).ok())
    }

    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        self.0.as_object()
    }
}
