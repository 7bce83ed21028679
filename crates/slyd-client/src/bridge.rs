use crate::error::{ClientError, Result};
use crate::ManagementClient;
use slyd_core::api::{self, Ack};
use slyd_core::token::looks_masked;
use slyd_core::{ConfigForm, RawConfig, ServiceConfig};

/// Moves configuration between the form, the raw editor and the backend.
#[derive(Debug, Clone)]
pub struct ConfigFormBridge {
    client: ManagementClient,
}

impl ConfigFormBridge {
    pub fn new(client: ManagementClient) -> Self {
        Self { client }
    }

    pub async fn check_model(&self, model_id: &str) -> Result<()> {
        let model_id = model_id.trim();
        if model_id.is_empty() {
            return Err(ClientError::Validation("Please enter a model ID".to_string()));
        }

        let resp = self.client.check_model(model_id).await?;
        if !resp.valid {
            return Err(ClientError::rejected(resp.message, "Model not found"));
        }
        Ok(())
    }

    /// Read the whole form and store it. Nothing is sent if a field is bad.
    /// Optional fields set in `previous` but now blank are cleared on the backend.
    pub async fn save(&self, form: &ConfigForm, previous: Option<&ServiceConfig>) -> Result<ServiceConfig> {
        let config = form.collect()?;
        let body = config.update_body(previous)?;
        tracing::debug!("Saving config for model {}", config.model);
        accepted(self.client.update_config(&body).await?)?;
        Ok(config)
    }

    pub async fn reset(&self) -> Result<()> {
        accepted(self.client.reset_config().await?)?;
        Ok(())
    }

    pub async fn load_raw(&self) -> Result<RawConfig> {
        let resp = self.client.get_raw_config().await?;
        match resp.config {
            Some(config) if resp.success => Ok(config),
            _ => Err(ClientError::rejected(resp.message, "Unknown error")),
        }
    }

    /// Fetch the stored config as the form sees it.
    pub async fn load_config(&self) -> Result<ServiceConfig> {
        let raw = self.load_raw().await?;
        let config = ServiceConfig::from_raw(&raw).map_err(|e| ClientError::Decode {
            endpoint: api::GET_RAW_CONFIG.to_string(),
            status: 200,
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Parse editor text and store it verbatim. Only JSON syntax is checked.
    pub async fn save_raw(&self, text: &str) -> Result<RawConfig> {
        let config = RawConfig::parse(text)?;
        accepted(self.client.save_raw_config(&config).await?)?;
        Ok(config)
    }

    /// Returns the masked token the backend echoes back, if any.
    pub async fn save_token(&self, token: &str) -> Result<Option<String>> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClientError::Validation("Please enter a token".to_string()));
        }
        if looks_masked(token) {
            return Err(ClientError::Validation("Invalid token format".to_string()));
        }

        let ack = accepted(self.client.save_token(token).await?)?;
        Ok(ack.masked_token)
    }
}

fn accepted(ack: Ack) -> Result<Ack> {
    if ack.success {
        Ok(ack)
    } else {
        Err(ClientError::rejected(ack.message, "Unknown error"))
    }
}
