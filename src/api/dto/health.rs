//! Health check DTOs for API responses.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response structure.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2024-01-01T12:00:00Z",
    "checks": {
        "store": {
            "status": "healthy",
            "message": "Connected",
            "response_time_ms": 5
        }
    }
}))]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Application version
    pub version: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
    /// Per-component results, keyed by component name
    pub checks: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Overall status is the worst of the component statuses.
    pub fn from_checks(checks: BTreeMap<String, ComponentHealth>) -> Self {
        let status = checks
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);
        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Timestamp::now(),
            checks,
        }
    }
}

/// Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub message: Option<String>,
    pub response_time_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(status: HealthStatus) -> ComponentHealth {
        ComponentHealth {
            status,
            message: None,
            response_time_ms: Some(1),
        }
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Unhealthy).unwrap();
        assert_eq!(json, "\"unhealthy\"");
    }

    #[test]
    fn test_overall_status_is_worst_component() {
        let mut checks = BTreeMap::new();
        checks.insert("store".to_string(), component(HealthStatus::Healthy));
        assert_eq!(
            HealthResponse::from_checks(checks).status,
            HealthStatus::Healthy
        );

        let mut checks = BTreeMap::new();
        checks.insert("store".to_string(), component(HealthStatus::Unhealthy));
        checks.insert("cache".to_string(), component(HealthStatus::Degraded));
        assert_eq!(
            HealthResponse::from_checks(checks).status,
            HealthStatus::Unhealthy
        );

        assert_eq!(
            HealthResponse::from_checks(BTreeMap::new()).status,
            HealthStatus::Healthy
        );
    }
}
