use crate::StatusMessage;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMetrics {
    pub latency_ms: f64,
    pub throughput_tps: f64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub metrics: Option<ChatMetrics>,
}

impl ChatReply {
    pub fn render(&self) -> String {
        let mut out = self.response.clone();
        if let Some(m) = &self.metrics {
            out.push_str("\n\n");
            out.push_str(&format!("Latency:           {:.2} ms\n", m.latency_ms));
            out.push_str(&format!("Throughput:        {:.2} tokens/sec\n", m.throughput_tps));
            out.push_str(&format!("Prompt Tokens:     {}\n", m.prompt_tokens));
            out.push_str(&format!("Completion Tokens: {}\n", m.completion_tokens));
            out.push_str(&format!("Total Tokens:      {}\n", m.total_tokens));
            out.push_str(&format!("Time:              {:.2} s", m.time_seconds));
        }
        out
    }
}

/// A failed completion: the server's message plus whatever detail it sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFailure {
    pub message: StatusMessage,
    pub details: Option<String>,
}

impl ChatFailure {
    pub fn render(&self) -> String {
        match self.details.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(details) => format!("{}\n{}", self.message, details),
            None => self.message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_shows_response_verbatim_then_metrics() {
        let reply = ChatReply {
            response: "  4\n".to_string(),
            metrics: Some(ChatMetrics {
                latency_ms: 812.456,
                throughput_tps: 24.6,
                prompt_tokens: 12,
                completion_tokens: 20,
                total_tokens: 32,
                time_seconds: 0.81,
            }),
        };
        let text = reply.render();
        assert!(text.starts_with("  4\n\n\n"));
        assert!(text.contains("Latency:           812.46 ms"));
        assert!(text.contains("Total Tokens:      32"));
        assert!(text.ends_with("Time:              0.81 s"));
    }

    #[test]
    fn test_failure_with_details() {
        let failure = ChatFailure {
            message: StatusMessage::error("vLLM error: 500"),
            details: Some("CUDA out of memory".to_string()),
        };
        assert_eq!(failure.render(), "✗ vLLM error: 500\nCUDA out of memory");
    }
}
