use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Body of a successful `run-benchmark` call. Produced entirely server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub timestamp: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(
        serialize_with = "serialize_entries",
        deserialize_with = "deserialize_entries"
    )]
    pub tests: Vec<TestEntry>,
}

/// One named test, kept in the order the server listed it.
#[derive(Debug, Clone, PartialEq)]
pub struct TestEntry {
    pub name: String,
    pub outcome: TestOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TestOutcome {
    Failed { error: String },
    Latency(LatencyReport),
    Concurrent(ConcurrentReport),
    Throughput(ThroughputReport),
    Stress(StressReport),
    /// A test name this console has no layout for.
    Other(Value),
}

impl TestOutcome {
    /// The shape of a result depends on the test's name, unless it carries
    /// an `error`, which wins regardless of name.
    pub fn from_entry(name: &str, value: Value) -> Result<Self, serde_json::Error> {
        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            let error = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Ok(TestOutcome::Failed { error });
        }

        Ok(match name {
            "latency" => TestOutcome::Latency(serde_json::from_value(value)?),
            "concurrent" => TestOutcome::Concurrent(serde_json::from_value(value)?),
            "throughput" => TestOutcome::Throughput(serde_json::from_value(value)?),
            "stress" => TestOutcome::Stress(serde_json::from_value(value)?),
            _ => TestOutcome::Other(value),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyReport {
    pub num_requests: u64,
    pub success_rate: f64,
    pub latency: LatencyStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_first_byte: Option<FirstByteStats>,
    pub throughput: LatencyThroughput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub mean: f64,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstByteStats {
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyThroughput {
    pub mean_tokens_per_second: f64,
    pub max_tokens_per_second: f64,
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrentReport {
    pub num_concurrent_clients: u64,
    pub requests_per_client: u64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub success_rate: f64,
    pub total_test_time: f64,
    pub requests_per_second: f64,
    pub latency_under_load: LoadLatencyStats,
    pub throughput_under_load: ConcurrentThroughput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadLatencyStats {
    pub mean: f64,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrentThroughput {
    pub mean_tokens_per_second: f64,
    pub aggregate_tokens_per_second: f64,
    pub total_tokens_processed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputReport {
    pub test_duration: f64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub success_rate: f64,
    pub requests_per_second: f64,
    pub tokens_per_second: f64,
    pub total_tokens_processed: u64,
    pub average_tokens_per_request: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    pub max_concurrent_tested: u64,
    pub results_by_load: Vec<StressLevel>,
    pub optimal_concurrent: u64,
    pub max_sustainable_load: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressLevel {
    pub concurrent_clients: u64,
    pub success_rate: f64,
    pub mean_latency: f64,
    pub p99_latency: f64,
    pub requests_per_second: f64,
    #[serde(default)]
    pub failed_requests: u64,
}

fn serialize_entries<S: Serializer>(entries: &[TestEntry], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for entry in entries {
        map.serialize_entry(&entry.name, &entry.outcome)?;
    }
    map.end()
}

fn deserialize_entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<TestEntry>, D::Error> {
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<TestEntry>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of test name to test result")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, value)) = access.next_entry::<String, Value>()? {
                let outcome = TestOutcome::from_entry(&name, value)
                    .map_err(|e| de::Error::custom(format!("test {:?}: {}", name, e)))?;
                entries.push(TestEntry { name, outcome });
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_keep_server_order() {
        let result: BenchmarkResult = serde_json::from_value(json!({
            "timestamp": "2024-01-01T00:00:00",
            "model": "m",
            "tests": {
                "throughput": {"error": "No successful requests"},
                "latency": {"error": "timeout"},
                "warmup": {"note": "custom"}
            }
        }))
        .unwrap();
        let names: Vec<_> = result.tests.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["throughput", "latency", "warmup"]);
        assert!(matches!(result.tests[2].outcome, TestOutcome::Other(_)));
    }

    #[test]
    fn test_error_wins_over_shape() {
        let outcome = TestOutcome::from_entry("latency", json!({"error": {"code": 7}})).unwrap();
        assert_eq!(
            outcome,
            TestOutcome::Failed {
                error: "{\"code\":7}".to_string()
            }
        );
    }

    #[test]
    fn test_missing_numeric_field_is_a_decode_error() {
        let err = serde_json::from_value::<BenchmarkResult>(json!({
            "timestamp": "t",
            "model": "m",
            "tests": {"throughput": {"test_duration": 1.0}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("throughput"));
    }

    #[test]
    fn test_serialize_back_to_same_shape() {
        let value = json!({
            "timestamp": "t",
            "model": "m",
            "tests": {
                "stress": {
                    "max_concurrent_tested": 5,
                    "results_by_load": [{
                        "concurrent_clients": 1,
                        "success_rate": 100.0,
                        "mean_latency": 0.5,
                        "p99_latency": 0.7,
                        "requests_per_second": 2.0,
                        "failed_requests": 0
                    }],
                    "optimal_concurrent": 1,
                    "max_sustainable_load": 1
                },
                "latency": {"error": "boom"}
            }
        });
        let result: BenchmarkResult = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), value);
    }
}
