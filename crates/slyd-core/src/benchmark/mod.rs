mod report;
mod suite;
mod types;

pub use report::{format_report, load_marker};
pub use suite::{TestSuite, UnknownSuite};
pub use types::{
    BenchmarkResult, ConcurrentReport, ConcurrentThroughput, FirstByteStats, LatencyReport,
    LatencyStats, LatencyThroughput, LoadLatencyStats, StressLevel, StressReport, TestEntry,
    TestOutcome, ThroughputReport,
};
