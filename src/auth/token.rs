// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token codec (HS256, shared secret).
//!
//! Verification and decoding are separate operations:
//!
//! - [`TokenCodec::verify`] checks the signature and reports whether a
//!   failure was an expiry, without deciding what the caller does with it.
//! - [`TokenCodec::decode`] reads the payload without any check. It exists
//!   for inspection and for the decode-only authentication mode.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{AuthError, Claims};

/// Signing algorithm for every token this service issues or accepts.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Outcome of [`TokenCodec::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub valid: bool,
    /// Set only when the failure reason is expiry
    pub expired: bool,
    pub claims: Option<Claims>,
    pub message: Option<String>,
}

impl Verification {
    fn success(claims: Claims) -> Self {
        Self {
            valid: true,
            expired: false,
            claims: Some(claims),
            message: None,
        }
    }

    fn failure(expired: bool, message: String) -> Self {
        Self {
            valid: false,
            expired,
            claims: None,
            message: Some(message),
        }
    }
}

/// Options for [`TokenCodec::sign`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SignOptions {
    /// Lifetime of the token; the codec's default expiry when `None`.
    pub expires_in: Option<Duration>,
}

/// Signs, verifies and decodes bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_expiry: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("default_expiry", &self.default_expiry)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], default_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            default_expiry: Duration::hours(default_expiry_hours),
        }
    }

    pub fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    /// Sign `claims`, stamping `iat` with the current time and `exp` with
    /// `iat + expires_in`. Any timestamps already on `claims` are replaced.
    pub fn sign(&self, claims: &Claims, options: SignOptions) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_in = options.expires_in.unwrap_or(self.default_expiry);

        let mut payload = claims.clone();
        payload.iat = Some(now.timestamp());
        payload.exp = Some((now + expires_in).timestamp());

        encode(&Header::new(TOKEN_ALGORITHM), &payload, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify the signature (and `exp`/`nbf` when present).
    ///
    /// Audience is not checked here, and `exp` is optional. Never fails:
    /// every error is folded into the returned [`Verification`].
    pub fn verify(&self, token: &str) -> Verification {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Verification::success(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "token verification failed");
                let expired = matches!(e.kind(), ErrorKind::ExpiredSignature);
                let message = if expired {
                    "jwt expired".to_string()
                } else {
                    e.to_string()
                };
                Verification::failure(expired, message)
            }
        }
    }

    /// Read the claims without checking the signature or expiry.
    ///
    /// Returns `None` for anything that is not a well-formed token carrying
    /// a claims payload. Never use the result for a trust decision on its own.
    pub fn decode(&self, token: &str) -> Option<Claims> {
        match jsonwebtoken::dangerous::insecure_decode::<Claims>(token) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "token decode failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-secret", 1)
    }

    fn sample_claims() -> Claims {
        Claims::new("uid_123", "ana@example.com", Role::User).with_audience("pocketbook-app")
    }

    #[test]
    fn sign_then_decode_returns_payload() {
        let codec = codec();
        let claims = sample_claims();
        let token = codec.sign(&claims, SignOptions::default()).unwrap();

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded.clone().without_timestamps(), claims);

        let iat = decoded.iat.unwrap();
        let exp = decoded.exp.unwrap();
        assert_eq!(exp - iat, 3600);
    }

    #[test]
    fn verify_accepts_own_signature() {
        let codec = codec();
        let token = codec.sign(&sample_claims(), SignOptions::default()).unwrap();

        let result = codec.verify(&token);
        assert!(result.valid);
        assert!(!result.expired);
        assert!(result.message.is_none());
        assert_eq!(result.claims.unwrap().user_id, "uid_123");
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let other = TokenCodec::new(b"someone-else", 1);
        let token = other.sign(&sample_claims(), SignOptions::default()).unwrap();

        let result = codec().verify(&token);
        assert!(!result.valid);
        assert!(!result.expired);
        assert!(result.claims.is_none());
        assert!(result.message.is_some());
    }

    #[test]
    fn verify_flags_expired_token() {
        let codec = codec();
        let options = SignOptions {
            expires_in: Some(Duration::minutes(-5)),
        };
        let token = codec.sign(&sample_claims(), options).unwrap();

        let result = codec.verify(&token);
        assert!(!result.valid);
        assert!(result.expired);
        assert_eq!(result.message.as_deref(), Some("jwt expired"));
    }

    #[test]
    fn verify_reports_garbage_without_panicking() {
        let result = codec().verify("not-a-token");
        assert!(!result.valid);
        assert!(!result.expired);
        assert!(result.message.is_some());
    }

    #[test]
    fn decode_ignores_signature_and_expiry() {
        let other = TokenCodec::new(b"someone-else", 1);
        let options = SignOptions {
            expires_in: Some(Duration::hours(-2)),
        };
        let token = other.sign(&sample_claims(), options).unwrap();

        let decoded = codec().decode(&token).unwrap();
        assert_eq!(decoded.user_id, "uid_123");
    }

    #[test]
    fn decode_returns_none_for_malformed_input() {
        assert!(codec().decode("").is_none());
        assert!(codec().decode("a.b.c").is_none());
        assert!(codec().decode("only-one-segment").is_none());
    }
}
