//! Everything the console shows, held in one place and rendered by pure
//! functions. Network code writes results in; nothing here does I/O.

use crate::{
    format_report, BenchmarkResult, ChatFailure, ChatReply, ConfigForm, StatusMessage,
    StatusReport, TestSuite,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ServicePanel {
    Report(StatusReport),
    Message(StatusMessage),
}

impl ServicePanel {
    pub fn render(&self) -> String {
        match self {
            ServicePanel::Report(report) => report.render(),
            ServicePanel::Message(message) => message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            ServicePanel::Report(report) => !report.status.active,
            ServicePanel::Message(message) => message.is_error(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatPanel {
    Reply(ChatReply),
    Failed(ChatFailure),
}

impl ChatPanel {
    pub fn render(&self) -> String {
        match self {
            ChatPanel::Reply(reply) => reply.render(),
            ChatPanel::Failed(failure) => failure.render(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ChatPanel::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BenchmarkPanel {
    Running(TestSuite),
    Report(BenchmarkResult),
    Failed(StatusMessage),
}

impl BenchmarkPanel {
    pub fn render(&self) -> String {
        match self {
            BenchmarkPanel::Running(suite) => suite.caption().to_string(),
            BenchmarkPanel::Report(result) => format_report(result),
            BenchmarkPanel::Failed(message) => message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BenchmarkPanel::Failed(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    pub form: ConfigForm,
    /// Text of the raw JSON editor.
    pub raw_editor: String,
    pub model_status: Option<StatusMessage>,
    pub service: Option<ServicePanel>,
    pub raw_editor_status: Option<StatusMessage>,
    /// Outcome of form-level actions (save, reset, token).
    pub alert: Option<StatusMessage>,
    pub chat: Option<ChatPanel>,
    pub benchmark: Option<BenchmarkPanel>,
}

impl ConsoleState {
    pub fn render_form(&self) -> String {
        let fields = self.form.fields();
        let width = fields.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        fields
            .iter()
            .map(|(key, value)| {
                let shown = if value.is_empty() { "-" } else { value.as_str() };
                format!("  {:<width$}  {}", key, shown, width = width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChatMetrics, ServiceConfig};

    #[test]
    fn test_render_form_aligns_keys() {
        let state = ConsoleState {
            form: ConfigForm::from_config(&ServiceConfig::default()),
            ..Default::default()
        };
        let text = state.render_form();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("  model "));
        assert!(first.ends_with("HuggingFaceTB/SmolLM3-3B"));
        assert!(text.contains("  quantization            -"));
        assert!(text.contains("  trust_remote_code       off"));
    }

    #[test]
    fn test_panels_report_errors() {
        assert!(ServicePanel::Message(StatusMessage::error("x")).is_error());
        assert!(!ChatPanel::Reply(ChatReply {
            response: "ok".to_string(),
            metrics: Some(ChatMetrics::default()),
        })
        .is_error());
        assert_eq!(
            BenchmarkPanel::Running(TestSuite::Stress).render(),
            TestSuite::Stress.caption()
        );
    }
}
