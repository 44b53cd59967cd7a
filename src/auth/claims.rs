// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token claims and the profile id attached by the profile gate.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;

/// Claims carried by a bearer token.
///
/// Tokens are issued by the identity provider with the user's identifier in
/// `user_id`, plus the standard registered claims. The payload is decoded
/// once per request by the authentication gate and stored in the request
/// extensions; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Canonical identity of the caller (owner id of their profile)
    pub user_id: String,

    /// Absent or `null` decodes as an empty string
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,

    /// Audience tag, compared against the configured audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// An absent role decodes as `GUEST`. A `null` or unrecognized role
    /// decodes as `None`, which no role gate accepts.
    #[serde(default = "guest_role", deserialize_with = "lenient_role")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued at (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl Claims {
    /// Claims for `user_id` with every optional field empty.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            email_verified: None,
            aud: None,
            role: Some(role),
            sub: None,
            iss: None,
            iat: None,
            exp: None,
            nbf: None,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    /// Whether the carried role satisfies a gate requiring `required`.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.is_some_and(|role| role.permits(required))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Same payload with the signature timestamps removed.
    pub fn without_timestamps(mut self) -> Self {
        self.iat = None;
        self.exp = None;
        self
    }
}

fn guest_role() -> Option<Role> {
    Some(Role::Guest)
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| v.as_str()).and_then(Role::parse))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Internal identifier of the caller's profile, attached by
/// [`attach_profile`](super::middleware::attach_profile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(pub Uuid);

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_provider_payload() {
        let json = r#"{
            "user_id": "uid_123",
            "email": "ana@example.com",
            "email_verified": true,
            "aud": "pocketbook-app",
            "role": "ADMIN",
            "sub": "uid_123",
            "iss": "https://issuer.example.com",
            "iat": 1700000000,
            "exp": 1700003600
        }"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.user_id, "uid_123");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.aud.as_deref(), Some("pocketbook-app"));
        assert_eq!(claims.role, Some(Role::Admin));
        assert_eq!(claims.exp, Some(1700003600));
    }

    #[test]
    fn missing_role_defaults_to_guest() {
        let claims: Claims = serde_json::from_str(r#"{"user_id":"uid_1"}"#).unwrap();
        assert_eq!(claims.role, Some(Role::Guest));
        assert!(claims.has_role(Role::Guest));
        assert!(claims.email.is_empty());
        assert!(claims.aud.is_none());
    }

    #[test]
    fn null_or_unknown_role_matches_no_gate() {
        for payload in [
            r#"{"user_id":"uid_1","role":null}"#,
            r#"{"user_id":"uid_1","role":"SUPPORT"}"#,
            r#"{"user_id":"uid_1","role":7}"#,
        ] {
            let claims: Claims = serde_json::from_str(payload).unwrap();
            assert_eq!(claims.role, None, "{payload}");
            for required in [Role::Guest, Role::User, Role::Admin] {
                assert!(!claims.has_role(required), "{payload} passed {required}");
            }
        }
    }

    #[test]
    fn null_email_decodes_as_empty() {
        let claims: Claims =
            serde_json::from_str(r#"{"user_id":"uid_1","email":null,"role":"user"}"#).unwrap();
        assert!(claims.email.is_empty());
        assert_eq!(claims.role, Some(Role::User));
    }

    #[test]
    fn unrecognized_role_survives_a_round_trip() {
        let mut claims = Claims::new("uid_1", "ana@example.com", Role::User);
        claims.role = None;
        let json = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.role, None);
    }

    #[test]
    fn missing_user_id_is_rejected() {
        let result = serde_json::from_str::<Claims>(r#"{"email":"a@b.c"}"#);
        assert!(result.is_err());
    }
}
