// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::routes::{Controller, RouteDescriptor, RouteMethod};
use crate::storage::ProfileStore;

pub fn routes() -> Controller {
    Controller::new(
        "",
        vec![
            RouteDescriptor::new(RouteMethod::Get, "/", &[], base_path),
            RouteDescriptor::new(RouteMethod::Get, "/health", &[], health),
            RouteDescriptor::new(RouteMethod::Get, "/health/live", &[], liveness),
            RouteDescriptor::new(RouteMethod::Get, "/health/ready", &[], readiness),
        ],
    )
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Profile database availability.
    pub storage: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Base path handler.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service banner", body = MessageResponse))
)]
pub async fn base_path() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "base path".to_string(),
    })
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(
    State(profiles): State<Arc<ProfileStore>>,
) -> (StatusCode, Json<ReadyResponse>) {
    let storage_ok = match profiles.health_check() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "profile store health check failed");
            false
        }
    };

    let response = ReadyResponse {
        status: if storage_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            storage: if storage_ok { "ok" } else { "unavailable" }.to_string(),
        },
    };

    let status = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler. Same checks as `/health`.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(profiles: State<Arc<ProfileStore>>) -> (StatusCode, Json<ReadyResponse>) {
    health(profiles).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (Arc<ProfileStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(&dir.path().join("profiles.redb")).unwrap();
        (Arc::new(store), dir)
    }

    #[tokio::test]
    async fn base_path_message() {
        let Json(body) = base_path().await;
        assert_eq!(body.message, "base path");
    }

    #[tokio::test]
    async fn liveness_returns_ok() {
        let Json(body) = liveness().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn health_reports_storage() {
        let (store, _dir) = temp_store();
        let (status, Json(body)) = health(State(store.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.checks.storage, "ok");

        let (status, _) = readiness(State(store)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
