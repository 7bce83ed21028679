//! The console: one owner of [`ConsoleState`] that runs each user action
//! through its component and records the outcome for rendering.
//!
//! Every action awaits at most one management call (a status check may add
//! the liveness probe afterwards). Failures end up in the state as messages
//! and are never retried.

use crate::error::{ClientError, Result};
use crate::{BenchmarkRunner, ChatInvoker, ConfigFormBridge, ManagementClient, ServiceStatusPoller};
use slyd_core::{
    BenchmarkPanel, ChatFailure, ChatPanel, ConfigForm, ConsoleConfig, ConsoleState,
    ServiceConfig, ServicePanel, StatusMessage, TestSuite,
};
use slyd_core::token::mask_token;
use std::time::Duration;

pub struct Console {
    config: ConsoleConfig,
    bridge: ConfigFormBridge,
    poller: ServiceStatusPoller,
    chat: ChatInvoker,
    benchmark: BenchmarkRunner,
    state: ConsoleState,
    /// Config the form was last loaded from or saved as.
    loaded: Option<ServiceConfig>,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let client = ManagementClient::new(&config)?;

        // Until the backend is asked, assume factory settings on the configured port.
        let mut form = ConfigForm::from_config(&ServiceConfig::default());
        form.port = config.service_port.to_string();

        Ok(Self {
            bridge: ConfigFormBridge::new(client.clone()),
            poller: ServiceStatusPoller::new(client.clone(), config.clone()),
            chat: ChatInvoker::new(client.clone()),
            benchmark: BenchmarkRunner::new(client),
            state: ConsoleState {
                form,
                ..Default::default()
            },
            loaded: None,
            config,
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn form_mut(&mut self) -> &mut ConfigForm {
        &mut self.state.form
    }

    pub fn set_raw_editor(&mut self, text: impl Into<String>) {
        self.state.raw_editor = text.into();
    }

    /// Pre-fill the form from the stored config.
    pub async fn load_form(&mut self) -> Result<&ConfigForm> {
        let config = self.bridge.load_config().await?;
        self.state.form = ConfigForm::from_config(&config);
        self.loaded = Some(config);
        Ok(&self.state.form)
    }

    pub async fn check_model(&mut self) -> &StatusMessage {
        let message = match self.bridge.check_model(&self.state.form.model).await {
            Ok(()) => StatusMessage::success("Model is valid and accessible"),
            Err(ClientError::Rejected { message, .. }) => StatusMessage::error(message),
            Err(e) => failure("Error checking model", &e),
        };
        self.state.model_status.insert(message)
    }

    pub async fn save_config(&mut self) -> &StatusMessage {
        let message = match self.bridge.save(&self.state.form, self.loaded.as_ref()).await {
            Ok(saved) => {
                self.loaded = Some(saved);
                StatusMessage::success("Configuration saved successfully")
            }
            Err(e) => failure("Error saving configuration", &e),
        };
        self.state.alert.insert(message)
    }

    pub async fn restart_service(&mut self) -> &ServicePanel {
        let message = match self.poller.restart().await {
            Ok(()) => StatusMessage::success("Service restarted successfully"),
            Err(e) => failure("Error restarting service", &e),
        };
        self.state.service.insert(ServicePanel::Message(message))
    }

    /// Port the probe targets: whatever the form says, else the configured one.
    pub fn service_port(&self) -> u16 {
        self.state.form.port().unwrap_or(self.config.service_port)
    }

    pub async fn poll(&mut self) -> &ServicePanel {
        let panel = match self.poller.poll(self.service_port()).await {
            Ok(report) => ServicePanel::Report(report),
            Err(e) => ServicePanel::Message(failure("Error checking status", &e)),
        };
        self.state.service.insert(panel)
    }

    /// A single status check after a fixed wait, giving the service time to
    /// come up. There is no retry if it is still down.
    pub async fn poll_after(&mut self, delay: Duration) -> &ServicePanel {
        tracing::debug!("Waiting {:?} before checking status", delay);
        tokio::time::sleep(delay).await;
        self.poll().await
    }

    pub async fn reset_config(&mut self) -> &StatusMessage {
        let reset = self.bridge.reset().await;
        let message = match reset {
            Ok(()) => {
                if let Err(e) = self.load_form().await {
                    tracing::warn!("Could not reload config after reset: {}", e);
                }
                StatusMessage::success("Configuration reset to defaults")
            }
            Err(e) => failure("Error resetting configuration", &e),
        };
        self.state.alert.insert(message)
    }

    /// Fill the raw editor with the stored config.
    pub async fn load_raw(&mut self) -> Result<&str> {
        match self.bridge.load_raw().await {
            Ok(raw) => {
                self.state.raw_editor = raw.to_editor_text();
                Ok(&self.state.raw_editor)
            }
            Err(e) => {
                tracing::warn!("Error loading raw config: {}", e);
                Err(e)
            }
        }
    }

    pub async fn save_raw(&mut self) -> &StatusMessage {
        let message = match self.bridge.save_raw(&self.state.raw_editor).await {
            Ok(_) => StatusMessage::success("Raw configuration saved successfully"),
            Err(e) => failure("Error saving configuration", &e),
        };
        self.state.raw_editor_status.insert(message)
    }

    /// After a raw save the backend rewrites its files. Wait for that, reload
    /// the form (the port may have moved), then check status once.
    pub async fn settle_after_raw_save(&mut self) -> &ServicePanel {
        tokio::time::sleep(self.config.raw_save_settle()).await;
        if let Err(e) = self.load_form().await {
            tracing::warn!("Could not reload form after raw save: {}", e);
        }
        self.poll().await
    }

    pub async fn save_token(&mut self, token: &str) -> &StatusMessage {
        let message = match self.bridge.save_token(token).await {
            Ok(Some(masked)) => StatusMessage::success(format!("Token saved ({})", masked)),
            Ok(None) => StatusMessage::success(format!("Token saved ({})", mask_token(token.trim()))),
            Err(e) => failure("Error saving token", &e),
        };
        self.state.alert.insert(message)
    }

    pub async fn chat(&mut self, prompt: &str, max_tokens: u32, temperature: f32) -> &ChatPanel {
        let panel = match self.chat.send(prompt, max_tokens, temperature).await {
            Ok(reply) => ChatPanel::Reply(reply),
            Err(ClientError::Rejected { message, details }) => ChatPanel::Failed(ChatFailure {
                message: StatusMessage::error(message),
                details,
            }),
            Err(e) => ChatPanel::Failed(ChatFailure {
                message: failure("Error", &e),
                details: None,
            }),
        };
        self.state.chat.insert(panel)
    }

    pub async fn run_benchmark(&mut self, suite: TestSuite) -> &BenchmarkPanel {
        self.state.benchmark = Some(BenchmarkPanel::Running(suite));
        let panel = match self.benchmark.run(suite).await {
            Ok(result) => BenchmarkPanel::Report(result),
            Err(e) => BenchmarkPanel::Failed(failure("Benchmark failed", &e)),
        };
        self.state.benchmark.insert(panel)
    }
}

/// Local validation and bad JSON speak for themselves; everything else is
/// prefixed with the action that failed.
fn failure(action: &str, err: &ClientError) -> StatusMessage {
    match err {
        ClientError::Validation(_) | ClientError::InvalidJson(_) => {
            StatusMessage::error(err.to_string())
        }
        _ => StatusMessage::error(format!("{}: {}", action, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_prefixes() {
        let err = ClientError::rejected(None, "Unknown error");
        assert_eq!(
            failure("Error saving configuration", &err).to_string(),
            "✗ Error saving configuration: Unknown error"
        );

        let err = ClientError::Validation("Please enter a prompt".to_string());
        assert_eq!(failure("Error", &err).to_string(), "✗ Please enter a prompt");
    }

    #[test]
    fn test_initial_form_uses_configured_port() {
        let console = Console::new(ConsoleConfig {
            service_port: 8123,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(console.service_port(), 8123);
        assert_eq!(console.state().form.model, "HuggingFaceTB/SmolLM3-3B");
    }
}
