use crate::error::{ClientError, Result};
use crate::ManagementClient;
use slyd_core::{ConsoleConfig, Liveness, StatusReport};

/// One status check: the management API's answer, plus a direct probe of
/// the inference service when the API says it is up.
#[derive(Debug, Clone)]
pub struct ServiceStatusPoller {
    client: ManagementClient,
    config: ConsoleConfig,
}

impl ServiceStatusPoller {
    pub fn new(client: ManagementClient, config: ConsoleConfig) -> Self {
        Self { client, config }
    }

    /// Only the status call can fail this; the probe never does.
    pub async fn poll(&self, service_port: u16) -> Result<StatusReport> {
        let status = self.client.service_status().await?;
        tracing::info!("Service status: {} (active: {})", status.status, status.active);

        let liveness = if status.active {
            Some(self.probe(service_port).await)
        } else {
            None
        };

        Ok(StatusReport { status, liveness })
    }

    /// Ask the backend to restart the service. The caller decides when to
    /// check status again.
    pub async fn restart(&self) -> Result<()> {
        let ack = self.client.restart_service().await?;
        if !ack.success {
            return Err(ClientError::rejected(ack.message, "Unknown error"));
        }
        tracing::info!("Service restart requested");
        Ok(())
    }

    async fn probe(&self, port: u16) -> Liveness {
        let url = self.config.probe_url(port);
        match self.client.probe(&url).await {
            Ok(status) if status.is_success() => Liveness::Responding { port },
            Ok(status) => {
                tracing::debug!("Probe of {} answered {}", url, status);
                Liveness::NotOk {
                    port,
                    status: status.as_u16(),
                }
            }
            Err(e) => {
                tracing::warn!("Inference API not reachable at {}: {}", url, e);
                Liveness::Unreachable {
                    port,
                    reason: e.to_string(),
                }
            }
        }
    }
}
