use crate::StatusMessage;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `GET /service-status`. Missing or null fields read as "not running".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub details: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// What the direct `/v1/models` probe saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    Responding { port: u16 },
    NotOk { port: u16, status: u16 },
    Unreachable { port: u16, reason: String },
}

impl Liveness {
    /// Extra line under the badge. A non-OK answer adds nothing.
    pub fn annotation(&self) -> Option<StatusMessage> {
        match self {
            Liveness::Responding { port } => Some(StatusMessage::success(format!(
                "API is responding on port {}",
                port
            ))),
            Liveness::NotOk { .. } => None,
            Liveness::Unreachable { .. } => Some(StatusMessage::warning(
                "API not responding (service may be starting)",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: ServiceStatus,
    /// Present only when the service reported itself active.
    pub liveness: Option<Liveness>,
}

impl StatusReport {
    pub fn badge(&self) -> StatusMessage {
        if self.status.active {
            StatusMessage::success("Service is running")
        } else {
            StatusMessage::error("Service is not running")
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![self.badge().to_string()];
        if let Some(note) = self.liveness.as_ref().and_then(Liveness::annotation) {
            lines.push(note.to_string());
        }
        if let Some(details) = self.status.details.as_deref() {
            let details = details.trim_end();
            if !details.trim().is_empty() {
                lines.push(String::new());
                lines.extend(details.lines().map(|l| format!("  {}", l)));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(active: bool, liveness: Option<Liveness>, details: Option<&str>) -> StatusReport {
        StatusReport {
            status: ServiceStatus {
                active,
                status: if active { "active" } else { "inactive" }.to_string(),
                details: details.map(str::to_string),
            },
            liveness,
        }
    }

    #[test]
    fn test_running_with_responding_api() {
        let text = report(true, Some(Liveness::Responding { port: 5002 }), None).render();
        assert_eq!(text, "✓ Service is running\n✓ API is responding on port 5002");
    }

    #[test]
    fn test_probe_failure_is_only_a_warning() {
        let r = report(
            true,
            Some(Liveness::Unreachable {
                port: 5002,
                reason: "connection refused".to_string(),
            }),
            None,
        );
        assert!(!r.badge().is_error());
        assert!(r.render().ends_with("⚠ API not responding (service may be starting)"));
    }

    #[test]
    fn test_non_ok_probe_adds_nothing() {
        let r = report(true, Some(Liveness::NotOk { port: 5002, status: 503 }), None);
        assert_eq!(r.render(), "✓ Service is running");
    }

    #[test]
    fn test_details_block_is_indented() {
        let r = report(false, None, Some("vllm.service - vLLM\n   Active: inactive (dead)\n"));
        assert_eq!(
            r.render(),
            "✗ Service is not running\n\n  vllm.service - vLLM\n     Active: inactive (dead)"
        );
    }

    #[test]
    fn test_missing_fields_mean_inactive() {
        let status: ServiceStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.active);
        assert_eq!(status.details, None);
    }

    #[test]
    fn test_null_fields_mean_inactive() {
        let status: ServiceStatus =
            serde_json::from_str(r#"{"active": null, "status": null, "details": null}"#).unwrap();
        assert!(!status.active);
        assert_eq!(status.status, "");
        let r = StatusReport {
            status,
            liveness: None,
        };
        assert_eq!(r.render(), "✗ Service is not running");
    }
}
