// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gates for Axum.
//!
//! Gates are plain `from_fn` middleware. Each one either passes the request
//! on or returns an [`ApiError`]; none of them writes a response body.
//!
//! ## Ordering
//!
//! [`authenticate`] must run before any role gate and before
//! [`attach_profile`] on the same route. The later gates read the claims it
//! stores in the request extensions and do not authenticate on their own.
//! The route table in `api::routes` applies gates in the listed order.
//!
//! ```rust,ignore
//! let admin_only = get(handler)
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::{AuthError, Claims, ProfileId, Role};
use crate::error::ApiError;
use crate::state::AuthConfig;
use crate::storage::ProfileStore;

const BEARER_PREFIX: &str = "Bearer ";

/// Authentication gate.
///
/// Requires `Authorization: Bearer <token>`, checks the token audience and
/// stores the [`Claims`] in the request extensions.
pub async fn authenticate(
    State(config): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?;
    let claims = authenticate_token(token, &config)?;

    tracing::debug!(user_id = %claims.user_id, role = ?claims.role, "request authenticated");
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Pull the token out of the `Authorization` header.
fn bearer_token(request: &Request) -> Result<&str, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Turn a bearer token into claims.
///
/// NOTE: by default this only decodes the token. The signature and `exp`
/// are not checked, only the audience. `AUTH_VERIFY_SIGNATURES=true`
/// switches to full signature verification.
fn authenticate_token(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let claims = if config.verify_signatures {
        let verification = config.codec.verify(token);
        match verification.claims {
            Some(claims) if verification.valid => claims,
            _ if verification.expired => return Err(AuthError::TokenExpired),
            _ => {
                return Err(AuthError::InvalidSignature(
                    verification.message.unwrap_or_default(),
                ))
            }
        }
    } else {
        config.codec.decode(token).ok_or(AuthError::MalformedToken)?
    };

    if claims.aud.as_deref() != Some(config.audience.as_str()) {
        return Err(AuthError::InvalidAudience);
    }
    Ok(claims)
}

/// Role gate requiring `ADMIN`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Admin, request, next).await
}

/// Role gate requiring `USER`.
pub async fn require_user(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::User, request, next).await
}

/// Role gate requiring `GUEST`.
pub async fn require_guest(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Guest, request, next).await
}

async fn require_role(required: Role, request: Request, next: Next) -> Result<Response, ApiError> {
    check_role(request.extensions().get::<Claims>(), required)?;
    Ok(next.run(request).await)
}

/// Pass iff claims are present and carry exactly `required`.
pub fn check_role(claims: Option<&Claims>, required: Role) -> Result<(), AuthError> {
    match claims {
        None => Err(AuthError::NotAuthenticated),
        Some(claims) if claims.has_role(required) => Ok(()),
        Some(_) => Err(AuthError::InsufficientRole(required)),
    }
}

/// Profile attachment gate.
///
/// Resolves the authenticated identity to its profile and stores the
/// [`ProfileId`] in the request extensions.
pub async fn attach_profile(
    State(profiles): State<Arc<ProfileStore>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = request
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.user_id.clone())
        .ok_or(AuthError::NotAuthenticated)?;

    let profile = profiles
        .find_by_user_id(&user_id)?
        .ok_or(AuthError::ProfileNotFound)?;

    request.extensions_mut().insert(ProfileId(profile.id));
    Ok(next.run(request).await)
}
