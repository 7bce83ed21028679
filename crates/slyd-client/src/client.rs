use crate::error::{ClientError, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use slyd_core::api::{
    self, Ack, BenchmarkRequest, BenchmarkResponse, ChatRequest, ChatResponse, CheckModelRequest,
    CheckModelResponse, RawConfigResponse, SaveRawConfigRequest, SaveTokenRequest,
};
use slyd_core::{ConsoleConfig, RawConfig, ServiceStatus, TestSuite};
use std::time::Duration;

/// Typed access to the management API. One method per endpoint, returning
/// the envelope as sent; interpreting the success flag is up to the caller.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    base: String,
    token: Option<String>,
    benchmark_timeout: Duration,
    client: reqwest::Client,
}

impl ManagementClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base: config.api_base.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            benchmark_timeout: config.benchmark_timeout(),
            client,
        })
    }

    pub async fn check_model(&self, model_id: &str) -> Result<CheckModelResponse> {
        self.post(api::CHECK_MODEL, &CheckModelRequest { model_id }).await
    }

    pub async fn update_config(&self, body: &RawConfig) -> Result<Ack> {
        self.post(api::UPDATE_CONFIG, body).await
    }

    pub async fn restart_service(&self) -> Result<Ack> {
        self.post_empty(api::RESTART_SERVICE).await
    }

    pub async fn service_status(&self) -> Result<ServiceStatus> {
        self.get(api::SERVICE_STATUS).await
    }

    pub async fn reset_config(&self) -> Result<Ack> {
        self.post_empty(api::RESET_CONFIG).await
    }

    pub async fn get_raw_config(&self) -> Result<RawConfigResponse> {
        self.get(api::GET_RAW_CONFIG).await
    }

    pub async fn save_raw_config(&self, config: &RawConfig) -> Result<Ack> {
        self.post(api::SAVE_RAW_CONFIG, &SaveRawConfigRequest { config })
            .await
    }

    pub async fn save_token(&self, token: &str) -> Result<Ack> {
        self.post(api::SAVE_TOKEN, &SaveTokenRequest { token }).await
    }

    pub async fn chat_completion(&self, request: &ChatRequest<'_>) -> Result<ChatResponse> {
        self.post(api::CHAT_COMPLETION, request).await
    }

    /// Benchmarks run for minutes server-side, so this call gets its own timeout.
    pub async fn run_benchmark(&self, suite: TestSuite) -> Result<BenchmarkResponse> {
        let request = self
            .client
            .post(self.url(api::RUN_BENCHMARK))
            .timeout(self.benchmark_timeout)
            .json(&BenchmarkRequest { test_type: suite });
        self.send(api::RUN_BENCHMARK, request).await
    }

    /// Hit the inference service directly. Only the status code matters and
    /// no management credentials are sent.
    pub async fn probe(&self, url: &str) -> Result<StatusCode> {
        tracing::debug!("Probing {}", url);
        let resp = self.client.get(url).send().await?;
        Ok(resp.status())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let request = self.client.get(self.url(endpoint));
        self.send(endpoint, request).await
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.send(endpoint, request).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let request = self.client.post(self.url(endpoint));
        self.send(endpoint, request).await
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> Result<T> {
        tracing::info!("Calling {}", endpoint);
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!("{} answered {} ({} bytes)", endpoint, status, body.len());

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            ClientError::Decode {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                reason: format!("{} - Body: {}", e, preview),
            }
        })
    }
}
