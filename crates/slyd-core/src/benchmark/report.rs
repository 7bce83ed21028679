//! Plain-text rendering of a [`BenchmarkResult`].
//!
//! Pure and deterministic: the same result always yields the same bytes.
//! Latency and time figures get 2 decimals, throughput and percentages 1.

use super::types::{
    BenchmarkResult, ConcurrentReport, LatencyReport, StressLevel, StressReport, TestOutcome,
    ThroughputReport,
};
use chrono::{DateTime, NaiveDateTime};
use std::fmt::{self, Write};

const HEADER_RULE_WIDTH: usize = 61;
const SECTION_RULE_WIDTH: usize = 40;

pub fn format_report(result: &BenchmarkResult) -> String {
    Report(result).to_string()
}

/// Marker for one stress load level. The comparisons are strict: exactly
/// 50% is a warning and exactly 95% gets no marker.
pub fn load_marker(success_rate: f64) -> &'static str {
    if success_rate < 50.0 {
        "❌"
    } else if success_rate < 95.0 {
        "⚠️"
    } else if success_rate == 100.0 {
        "✅"
    } else {
        ""
    }
}

struct Report<'a>(&'a BenchmarkResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(
            f,
            "Benchmark Results - {} - Model: {}",
            format_timestamp(&result.timestamp),
            result.model
        )?;
        writeln!(f, "{}", "=".repeat(HEADER_RULE_WIDTH))?;

        for entry in &result.tests {
            writeln!(f)?;
            let name = entry.name.to_uppercase();

            if let TestOutcome::Failed { error } = &entry.outcome {
                writeln!(f, "{}: Error - {}", name, error)?;
                continue;
            }

            writeln!(f, "{} TEST", name)?;
            writeln!(f, "{}", "-".repeat(SECTION_RULE_WIDTH))?;
            match &entry.outcome {
                TestOutcome::Latency(r) => write_latency(f, r)?,
                TestOutcome::Concurrent(r) => write_concurrent(f, r)?,
                TestOutcome::Throughput(r) => write_throughput(f, r)?,
                TestOutcome::Stress(r) => write_stress(f, r)?,
                TestOutcome::Failed { .. } | TestOutcome::Other(_) => {}
            }
        }
        Ok(())
    }
}

fn write_latency(f: &mut impl Write, r: &LatencyReport) -> fmt::Result {
    writeln!(f, "Requests: {}", r.num_requests)?;
    writeln!(f, "Success Rate: {:.1}%", r.success_rate)?;
    writeln!(f)?;
    writeln!(f, "Latency (seconds):")?;
    writeln!(f, "  Mean:   {:.2}", r.latency.mean)?;
    writeln!(f, "  Median: {:.2}", r.latency.median)?;
    writeln!(f, "  P95:    {:.2}", r.latency.p95)?;
    writeln!(f, "  P99:    {:.2}", r.latency.p99)?;
    writeln!(f, "  Min:    {:.2}", r.latency.min)?;
    writeln!(f, "  Max:    {:.2}", r.latency.max)?;
    if let Some(ttfb) = &r.time_to_first_byte {
        writeln!(f)?;
        writeln!(f, "Time to First Byte (seconds):")?;
        writeln!(f, "  Mean:   {:.2}", ttfb.mean)?;
        writeln!(f, "  Median: {:.2}", ttfb.median)?;
    }
    writeln!(f)?;
    writeln!(f, "Throughput:")?;
    writeln!(f, "  Mean:   {:.1} tokens/sec", r.throughput.mean_tokens_per_second)?;
    writeln!(f, "  Max:    {:.1} tokens/sec", r.throughput.max_tokens_per_second)?;
    writeln!(
        f,
        "  Tokens: {} total ({} prompt, {} completion)",
        r.throughput.total_tokens, r.throughput.prompt_tokens, r.throughput.completion_tokens
    )
}

fn write_concurrent(f: &mut impl Write, r: &ConcurrentReport) -> fmt::Result {
    writeln!(
        f,
        "Clients: {} x {} requests",
        r.num_concurrent_clients, r.requests_per_client
    )?;
    writeln!(f, "Successful: {}/{}", r.successful_requests, r.total_requests)?;
    writeln!(f, "Success Rate: {:.1}%", r.success_rate)?;
    writeln!(f, "Total Time: {:.2}s", r.total_test_time)?;
    writeln!(f, "Requests/sec: {:.1}", r.requests_per_second)?;
    writeln!(f)?;
    writeln!(f, "Latency Under Load (seconds):")?;
    writeln!(f, "  Mean:   {:.2}", r.latency_under_load.mean)?;
    writeln!(f, "  Median: {:.2}", r.latency_under_load.median)?;
    writeln!(f, "  P95:    {:.2}", r.latency_under_load.p95)?;
    writeln!(f, "  P99:    {:.2}", r.latency_under_load.p99)?;
    writeln!(f)?;
    writeln!(f, "Throughput Under Load:")?;
    writeln!(
        f,
        "  Mean:      {:.1} tokens/sec",
        r.throughput_under_load.mean_tokens_per_second
    )?;
    writeln!(
        f,
        "  Aggregate: {:.1} tokens/sec",
        r.throughput_under_load.aggregate_tokens_per_second
    )?;
    writeln!(
        f,
        "  Tokens:    {}",
        r.throughput_under_load.total_tokens_processed
    )
}

fn write_throughput(f: &mut impl Write, r: &ThroughputReport) -> fmt::Result {
    writeln!(f, "Duration: {:.2}s", r.test_duration)?;
    writeln!(
        f,
        "Requests: {}/{} successful",
        r.successful_requests, r.total_requests
    )?;
    writeln!(f, "Success Rate: {:.1}%", r.success_rate)?;
    writeln!(f, "Requests/sec: {:.1}", r.requests_per_second)?;
    writeln!(f, "Tokens/sec: {:.1}", r.tokens_per_second)?;
    writeln!(f, "Total Tokens: {}", r.total_tokens_processed)?;
    writeln!(f, "Avg Tokens/Request: {:.1}", r.average_tokens_per_request)
}

fn write_stress(f: &mut impl Write, r: &StressReport) -> fmt::Result {
    writeln!(f, "Max Concurrent Tested: {}", r.max_concurrent_tested)?;
    writeln!(f, "Optimal Concurrent: {}", r.optimal_concurrent)?;
    writeln!(f, "Max Sustainable Load: {}", r.max_sustainable_load)?;
    writeln!(f)?;
    writeln!(f, "Results by Load:")?;
    for level in &r.results_by_load {
        write_load_level(f, level)?;
    }

    let recommendations = r.recommendations.as_deref().unwrap_or_default();
    if !recommendations.is_empty() {
        writeln!(f)?;
        writeln!(f, "Recommendations:")?;
        for rec in recommendations {
            writeln!(f, "  - {}", rec)?;
        }
    }
    Ok(())
}

fn write_load_level(f: &mut impl Write, level: &StressLevel) -> fmt::Result {
    let marker = load_marker(level.success_rate);
    write!(
        f,
        "  {:>3} clients: {:.1}% success, {:.1} req/s, mean {:.2}s, p99 {:.2}s",
        level.concurrent_clients,
        level.success_rate,
        level.requests_per_second,
        level.mean_latency,
        level.p99_latency
    )?;
    if marker.is_empty() {
        writeln!(f)?;
    } else {
        writeln!(f, " {}", marker)?;
    }
    if level.failed_requests > 0 {
        writeln!(f, "        Failed requests: {}", level.failed_requests)?;
    }
    Ok(())
}

/// Render in the timestamp's own offset so output never depends on the
/// local timezone. Unparseable input is shown as-is.
fn format_timestamp(raw: &str) -> String {
    const SHOWN: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(SHOWN).to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.format(SHOWN).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(value: Value) -> BenchmarkResult {
        serde_json::from_value(value).unwrap()
    }

    fn latency_test() -> Value {
        json!({
            "test_type": "latency",
            "num_requests": 10,
            "success_rate": 100,
            "latency": {"mean": 12.345, "median": 11.0, "p95": 20.5, "p99": 21.999, "min": 3.0, "max": 22.0},
            "time_to_first_byte": {"mean": 0.123, "median": 0.1},
            "throughput": {
                "mean_tokens_per_second": 50.0,
                "max_tokens_per_second": 61.26,
                "total_tokens": 2000,
                "prompt_tokens": 400,
                "completion_tokens": 1600
            }
        })
    }

    fn stress_test(levels: Value, recommendations: Option<Value>) -> Value {
        let mut test = json!({
            "test_type": "stress",
            "max_concurrent_tested": 15,
            "results_by_load": levels,
            "optimal_concurrent": 10,
            "max_sustainable_load": 10
        });
        if let Some(recs) = recommendations {
            test["recommendations"] = recs;
        }
        test
    }

    fn level(clients: u64, success_rate: f64, failed: u64) -> Value {
        json!({
            "concurrent_clients": clients,
            "success_rate": success_rate,
            "mean_latency": 1.5,
            "p99_latency": 2.25,
            "requests_per_second": 3.33,
            "failed_requests": failed
        })
    }

    #[test]
    fn test_latency_block() {
        let result = parse(json!({
            "timestamp": "2024-01-01T00:00:00Z",
            "model": "m",
            "tests": {"latency": latency_test()}
        }));
        let text = format_report(&result);

        assert!(text.starts_with("Benchmark Results - 2024-01-01 00:00:00 - Model: m\n"));
        assert!(text.contains(&format!("\n{}\n", "=".repeat(61))));
        assert!(text.contains(&format!("LATENCY TEST\n{}\n", "-".repeat(40))));
        assert!(text.contains("  Mean:   12.35\n"));
        assert!(text.contains("  P99:    22.00\n"));
        assert!(text.contains("Success Rate: 100.0%\n"));
        assert!(text.contains("  Mean:   50.0 tokens/sec\n"));
        assert!(text.contains("  Max:    61.3 tokens/sec\n"));
        assert!(text.contains("  Tokens: 2000 total (400 prompt, 1600 completion)\n"));
    }

    #[test]
    fn test_deterministic() {
        let result = parse(json!({
            "timestamp": "2024-06-30T18:45:12.123456",
            "model": "HuggingFaceTB/SmolLM3-3B",
            "tests": {
                "latency": latency_test(),
                "stress": stress_test(json!([level(1, 100.0, 0), level(5, 80.0, 2)]), None)
            }
        }));
        assert_eq!(format_report(&result), format_report(&result.clone()));
        assert!(format_report(&result).contains("2024-06-30 18:45:12"));
    }

    #[test]
    fn test_error_entry_is_one_line() {
        let result = parse(json!({
            "timestamp": "2024-01-01T00:00:00Z",
            "model": "m",
            "tests": {
                "concurrent": {"error": "No successful requests"},
                "latency": latency_test()
            }
        }));
        let text = format_report(&result);
        let concurrent: Vec<_> = text.lines().filter(|l| l.contains("CONCURRENT")).collect();
        assert_eq!(concurrent, ["CONCURRENT: Error - No successful requests"]);
        assert!(!text.contains("Clients:"));
        assert!(!text.contains("Latency Under Load"));

        let error_at = text.find("CONCURRENT: Error").unwrap();
        let next = &text[error_at..].lines().nth(1).unwrap();
        assert!(next.is_empty(), "expected separator, got {next:?}");
    }

    #[test]
    fn test_all_errors_has_no_detail_lines() {
        let result = parse(json!({
            "timestamp": "t",
            "model": "m",
            "tests": {"latency": {"error": "a"}, "throughput": {"error": "b"}}
        }));
        let text = format_report(&result);
        assert_eq!(
            text,
            format!(
                "Benchmark Results - t - Model: m\n{}\n\nLATENCY: Error - a\n\nTHROUGHPUT: Error - b\n",
                "=".repeat(61)
            )
        );
    }

    #[test]
    fn test_concurrent_and_throughput_blocks() {
        let result = parse(json!({
            "timestamp": "t",
            "model": "m",
            "tests": {
                "concurrent": {
                    "num_concurrent_clients": 5,
                    "requests_per_client": 3,
                    "total_requests": 15,
                    "successful_requests": 14,
                    "success_rate": 93.33333,
                    "total_test_time": 12.3456,
                    "requests_per_second": 1.1339,
                    "latency_under_load": {"mean": 4.444, "median": 4.0, "p95": 7.5, "p99": 8.0},
                    "throughput_under_load": {
                        "mean_tokens_per_second": 45.25,
                        "aggregate_tokens_per_second": 633.5,
                        "total_tokens_processed": 9000
                    }
                },
                "throughput": {
                    "test_duration": 20.531,
                    "total_requests": 190,
                    "successful_requests": 180,
                    "success_rate": 94.7368,
                    "requests_per_second": 8.767,
                    "tokens_per_second": 412.34,
                    "total_tokens_processed": 9876,
                    "average_tokens_per_request": 54.866
                }
            }
        }));
        let text = format_report(&result);
        assert!(text.contains("Clients: 5 x 3 requests\n"));
        assert!(text.contains("Successful: 14/15\n"));
        assert!(text.contains("Success Rate: 93.3%\n"));
        assert!(text.contains("Total Time: 12.35s\n"));
        assert!(text.contains("Requests/sec: 1.1\n"));
        assert!(text.contains("  Mean:   4.44\n"));
        assert!(text.contains("  Aggregate: 633.5 tokens/sec\n"));
        assert!(text.contains("Duration: 20.53s\n"));
        assert!(text.contains("Requests: 180/190 successful\n"));
        assert!(text.contains("Success Rate: 94.7%\n"));
        assert!(text.contains("Tokens/sec: 412.3\n"));
        assert!(text.contains("Avg Tokens/Request: 54.9\n"));
        assert!(text.find("CONCURRENT TEST").unwrap() < text.find("THROUGHPUT TEST").unwrap());
    }

    #[test]
    fn test_marker_boundaries() {
        assert_eq!(load_marker(0.0), "❌");
        assert_eq!(load_marker(49.9), "❌");
        assert_eq!(load_marker(50.0), "⚠️");
        assert_eq!(load_marker(94.99), "⚠️");
        assert_eq!(load_marker(95.0), "");
        assert_eq!(load_marker(99.9), "");
        assert_eq!(load_marker(100.0), "✅");
    }

    #[test]
    fn test_stress_levels_failures_and_recommendations() {
        let result = parse(json!({
            "timestamp": "t",
            "model": "m",
            "tests": {
                "stress": stress_test(
                    json!([level(1, 100.0, 0), level(10, 96.0, 1), level(15, 40.0, 18)]),
                    Some(json!(["Keep max_num_seqs at or below 10"]))
                )
            }
        }));
        let text = format_report(&result);
        let lines: Vec<&str> = text.lines().collect();

        let first = lines.iter().position(|l| l.contains("  1 clients")).unwrap();
        assert_eq!(
            lines[first],
            "    1 clients: 100.0% success, 3.3 req/s, mean 1.50s, p99 2.25s ✅"
        );
        assert_eq!(
            lines[first + 1],
            "   10 clients: 96.0% success, 3.3 req/s, mean 1.50s, p99 2.25s"
        );
        assert_eq!(lines[first + 2], "        Failed requests: 1");
        assert!(lines[first + 3].ends_with(" ❌"));
        assert_eq!(lines[first + 4], "        Failed requests: 18");

        assert!(text.ends_with("Recommendations:\n  - Keep max_num_seqs at or below 10\n"));
    }

    #[test]
    fn test_empty_recommendations_are_skipped() {
        let result = parse(json!({
            "timestamp": "t",
            "model": "m",
            "tests": {"stress": stress_test(json!([level(1, 100.0, 0)]), Some(json!([])))}
        }));
        assert!(!format_report(&result).contains("Recommendations"));
    }

    #[test]
    fn test_unknown_test_gets_header_only() {
        let result = parse(json!({
            "timestamp": "t",
            "model": "m",
            "tests": {"warmup": {"seconds": 3}}
        }));
        assert!(format_report(&result).ends_with(&format!("WARMUP TEST\n{}\n", "-".repeat(40))));
    }
}
