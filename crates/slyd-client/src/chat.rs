use crate::error::{ClientError, Result};
use crate::ManagementClient;
use slyd_core::api::ChatRequest;
use slyd_core::ChatReply;

#[derive(Debug, Clone)]
pub struct ChatInvoker {
    client: ManagementClient,
}

impl ChatInvoker {
    pub fn new(client: ManagementClient) -> Self {
        Self { client }
    }

    /// Send one prompt. An empty prompt never leaves the machine.
    pub async fn send(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<ChatReply> {
        if prompt.trim().is_empty() {
            return Err(ClientError::Validation("Please enter a prompt".to_string()));
        }

        let resp = self
            .client
            .chat_completion(&ChatRequest {
                prompt,
                max_tokens,
                temperature,
            })
            .await?;

        if !resp.success {
            return Err(ClientError::rejected(resp.message, "Unknown error").with_details(resp.details));
        }

        Ok(ChatReply {
            response: resp.response.unwrap_or_default(),
            metrics: resp.metrics,
        })
    }
}
