// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for values attached by the request gates.
//!
//! Handlers behind [`authenticate`](super::middleware::authenticate) read the
//! caller's claims with [`Auth`]; handlers behind
//! [`attach_profile`](super::middleware::attach_profile) read the resolved
//! profile id with [`CurrentProfile`]:
//!
//! ```rust,ignore
//! async fn details(
//!     CurrentProfile(id): CurrentProfile,
//!     State(profiles): State<Arc<ProfileStore>>,
//! ) -> Result<Json<Profile>, ApiError> {
//!     // ...
//! }
//! ```
//!
//! Both extractors only read the request extensions. A route that uses them
//! without the matching gate is rejected with `403`.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Claims, ProfileId};

/// Claims of the authenticated caller.
#[derive(Debug, Clone)]
pub struct Auth(pub Claims);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::NotAuthenticated)
    }
}

/// Profile id of the caller, resolved by the profile gate.
#[derive(Debug, Clone, Copy)]
pub struct CurrentProfile(pub ProfileId);

impl<S> FromRequestParts<S> for CurrentProfile
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if parts.extensions.get::<Claims>().is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        parts
            .extensions
            .get::<ProfileId>()
            .copied()
            .map(CurrentProfile)
            .ok_or(AuthError::ProfileNotFound)
    }
}
