// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{http::HeaderName, Router};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    models::{CreateProfileRequest, Profile, ProfileEnvelope, StatusResponse, UpdateProfileRequest},
    state::AppState,
};

pub mod health;
pub mod profiles;
pub mod routes;
pub mod validation;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Every controller served by the API, in registration order.
pub fn controllers() -> Vec<routes::Controller> {
    vec![health::routes(), profiles::routes()]
}

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    routes::register(&state, controllers())
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::base_path,
        health::health,
        health::liveness,
        health::readiness,
        profiles::list_profiles,
        profiles::get_profile_details,
        profiles::get_profile_by_user_id,
        profiles::create_profile,
        profiles::update_profile,
        profiles::delete_profile,
        profiles::deactivate_profile
    ),
    components(
        schemas(
            Profile,
            Role,
            CreateProfileRequest,
            UpdateProfileRequest,
            ProfileEnvelope,
            StatusResponse,
            health::MessageResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Profiles", description = "User profile management")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, SignOptions, TokenCodec};
    use crate::state::AuthConfig;
    use crate::storage::ProfileStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    const SECRET: &[u8] = b"router-secret";
    const AUDIENCE: &str = "pocketbook-app";

    fn test_router() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(&dir.path().join("profiles.redb")).unwrap();
        let auth = AuthConfig::new(TokenCodec::new(SECRET, 1), AUDIENCE);
        (router(AppState::new(auth, store)), dir)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn base_path_and_health_are_public() {
        let (app, _dir) = test_router();

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"message":"base path"}"#);

        for path in ["/health", "/health/live", "/health/ready"] {
            let response = app.clone().oneshot(get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn profile_routes_require_a_token() {
        let (app, _dir) = test_router();
        let response = app.oneshot(get("/api/v1/profiles/details")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let (app, _dir) = test_router();

        let response = app.clone().oneshot(get("/health/live")).await.unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let request = Request::builder()
            .uri("/health/live")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn full_profile_flow() {
        let (app, _dir) = test_router();
        let claims = Claims::new("uid_1", "ana@example.com", Role::User).with_audience(AUDIENCE);
        let token = TokenCodec::new(SECRET, 1)
            .sign(&claims, SignOptions::default())
            .unwrap();
        let auth = format!("Bearer {token}");

        let create = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/profiles")
            .header(header::AUTHORIZATION, &auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let details = Request::builder()
            .uri("/api/v1/profiles/details")
            .header(header::AUTHORIZATION, &auth)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(details).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let profile: Profile = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(profile.user_id, "uid_1");
        assert_eq!(profile.name, "default name");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (app, _dir) = test_router();
        let response = app.oneshot(get("/api-doc/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/profiles/details"));
    }
}
