//! Request and response bodies of the management API.
//!
//! Every response is an envelope with a success flag (`success`, `valid` or
//! `active`) and an optional `message`; failures are reported in-band, not
//! through HTTP status codes.

use crate::{BenchmarkResult, ChatMetrics, RawConfig, TestSuite};
use serde::{Deserialize, Serialize};

pub const CHECK_MODEL: &str = "check-model";
pub const UPDATE_CONFIG: &str = "update-config";
pub const RESTART_SERVICE: &str = "restart-service";
pub const SERVICE_STATUS: &str = "service-status";
pub const RESET_CONFIG: &str = "reset-config";
pub const GET_RAW_CONFIG: &str = "get-raw-config";
pub const SAVE_RAW_CONFIG: &str = "save-raw-config";
pub const SAVE_TOKEN: &str = "save-token";
pub const CHAT_COMPLETION: &str = "chat-completion";
pub const RUN_BENCHMARK: &str = "run-benchmark";

#[derive(Debug, Clone, Serialize)]
pub struct CheckModelRequest<'a> {
    pub model_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckModelResponse {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply to every write-style call.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub masked_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub config: Option<RawConfig>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveRawConfigRequest<'a> {
    pub config: &'a RawConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveTokenRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub metrics: Option<ChatMetrics>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRequest {
    pub test_type: TestSuite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<BenchmarkResult>,
    #[serde(default)]
    pub message: Option<String>,
}
