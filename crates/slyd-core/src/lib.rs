// Domain modules
pub mod api;
pub mod benchmark;
pub mod chat;
pub mod config;
pub mod error;
pub mod form;
pub mod launch;
pub mod message;
pub mod service_config;
pub mod state;
pub mod status;
pub mod token;

pub use benchmark::{
    format_report, load_marker, BenchmarkResult, ConcurrentReport, LatencyReport, StressLevel,
    StressReport, TestEntry, TestOutcome, TestSuite, ThroughputReport,
};
pub use chat::{ChatFailure, ChatMetrics, ChatReply, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
pub use config::ConsoleConfig;
pub use error::{Result, SlydError};
pub use form::{ConfigForm, FormError};
pub use message::{MessageKind, StatusMessage};
pub use service_config::{InvalidJson, RawConfig, ServiceConfig};
pub use state::{BenchmarkPanel, ChatPanel, ConsoleState, ServicePanel};
pub use status::{Liveness, ServiceStatus, StatusReport};
