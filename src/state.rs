// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::TokenCodec;
use crate::config::AuthSettings;
use crate::storage::ProfileStore;

/// Settings and codec used by the authentication gate.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub codec: Arc<TokenCodec>,
    /// Value the token `aud` claim must equal
    pub audience: String,
    /// Verify signatures instead of decoding only
    pub verify_signatures: bool,
}

impl AuthConfig {
    pub fn new(codec: TokenCodec, audience: impl Into<String>) -> Self {
        Self {
            codec: Arc::new(codec),
            audience: audience.into(),
            verify_signatures: false,
        }
    }

    pub fn with_signature_verification(mut self, enabled: bool) -> Self {
        self.verify_signatures = enabled;
        self
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        let codec = TokenCodec::new(settings.jwt_secret.as_bytes(), settings.jwt_expiry_hours);
        Self::new(codec, settings.audience.clone())
            .with_signature_verification(settings.verify_signatures)
    }
}

/// Shared application state, cloned into every request.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth_config: AuthConfig,
    pub profiles: Arc<ProfileStore>,
}

impl AppState {
    pub fn new(auth_config: AuthConfig, profiles: ProfileStore) -> Self {
        Self {
            auth_config,
            profiles: Arc::new(profiles),
        }
    }
}
