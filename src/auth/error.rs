// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::Role;
use crate::error::ApiError;

/// Failures raised by the token codec and the request gates.
///
/// Gates never render these themselves; they convert into [`ApiError`],
/// which owns the response format.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,

    #[error("Missing token")]
    MissingToken,

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Token audience is invalid")]
    InvalidAudience,

    #[error("Token signature is invalid: {0}")]
    InvalidSignature(String),

    #[error("Token has expired")]
    TokenExpired,

    /// A role or profile gate ran without claims in the request context.
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("{} access required", role_label(.0))]
    InsufficientRole(Role),

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Internal authentication error: {0}")]
    Internal(String),
}

fn role_label(role: &Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::User => "User",
        Role::Guest => "Guest",
    }
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::InvalidSignature(_) => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::NotAuthenticated | AuthError::InsufficientRole(_) => "forbidden",
            AuthError::ProfileNotFound => "not_found",
            AuthError::Signing(_) | AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::InvalidAudience
            | AuthError::InvalidSignature(_)
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::NotAuthenticated | AuthError::InsufficientRole(_) => StatusCode::FORBIDDEN,
            AuthError::ProfileNotFound => StatusCode::NOT_FOUND,
            AuthError::Signing(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "missing_auth_header");
        assert_eq!(body["error"], "Missing authorization header");
    }

    #[test]
    fn role_errors_are_forbidden_with_role_message() {
        let err = AuthError::InsufficientRole(Role::Admin);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Admin access required");
        assert_eq!(
            AuthError::InsufficientRole(Role::Guest).to_string(),
            "Guest access required"
        );
        assert_eq!(AuthError::NotAuthenticated.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn profile_not_found_is_404() {
        assert_eq!(AuthError::ProfileNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::ProfileNotFound.error_code(), "not_found");
    }
}
