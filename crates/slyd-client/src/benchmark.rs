use crate::error::{ClientError, Result};
use crate::ManagementClient;
use slyd_core::{BenchmarkResult, TestSuite};

/// Asks the backend to run a suite and waits for the whole result.
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    client: ManagementClient,
}

impl BenchmarkRunner {
    pub fn new(client: ManagementClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, suite: TestSuite) -> Result<BenchmarkResult> {
        tracing::info!("Starting {} benchmark ({})", suite, suite.tests().join(", "));

        let resp = self.client.run_benchmark(suite).await?;
        if !resp.success {
            return Err(ClientError::rejected(resp.message, "Unknown error"));
        }

        let result = resp
            .results
            .ok_or_else(|| ClientError::rejected(None, "Benchmark returned no results"))?;
        tracing::info!("Benchmark finished: {} tests for {}", result.tests.len(), result.model);
        Ok(result)
    }
}
