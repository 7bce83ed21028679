use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named benchmark suites the backend knows how to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSuite {
    #[default]
    Quick,
    Standard,
    Full,
    Stress,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown test type: {0} (expected quick, standard, full or stress)")]
pub struct UnknownSuite(pub String);

impl TestSuite {
    pub fn label(&self) -> &'static str {
        match self {
            TestSuite::Quick => "quick",
            TestSuite::Standard => "standard",
            TestSuite::Full => "full",
            TestSuite::Stress => "stress",
        }
    }

    /// Tests the backend runs for this suite, in order.
    pub fn tests(&self) -> &'static [&'static str] {
        match self {
            TestSuite::Quick => &["latency"],
            TestSuite::Standard => &["latency", "concurrent", "throughput"],
            TestSuite::Full => &["latency", "concurrent", "throughput", "stress"],
            TestSuite::Stress => &["stress"],
        }
    }

    /// Shown while the benchmark runs server-side.
    pub fn caption(&self) -> &'static str {
        match self {
            TestSuite::Quick => "Running quick benchmark (latency test)... this may take ~30 seconds",
            TestSuite::Standard => {
                "Running standard benchmark (latency, concurrent, throughput)... this may take 1-2 minutes"
            }
            TestSuite::Full => "Running full benchmark suite... this may take 3-5 minutes",
            TestSuite::Stress => "Running stress test... this may take several minutes",
        }
    }

    pub fn all() -> &'static [TestSuite] {
        &[
            TestSuite::Quick,
            TestSuite::Standard,
            TestSuite::Full,
            TestSuite::Stress,
        ]
    }
}

impl fmt::Display for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestSuite {
    type Err = UnknownSuite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TestSuite::all()
            .iter()
            .copied()
            .find(|suite| suite.label() == wanted)
            .ok_or_else(|| UnknownSuite(s.to_string()))
    }
}
