// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Profile records and the request bodies that create or change them. All
//! types derive `Serialize`/`Deserialize` and `ToSchema` for JSON handling
//! and OpenAPI documentation. JSON field names are camelCase.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Role;

pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_PROFILE_NAME: &str = "default name";

// =============================================================================
// Profile
// =============================================================================

/// A user's bookkeeping profile.
///
/// Keyed by `id`; `user_id` links it to the identity in the bearer token and
/// is unique, as is `email`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    /// Owner identity (token `user_id`)
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub lang: String,
    pub default_currency: String,
    #[serde(default)]
    pub is_onboard: bool,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_email: Option<String>,
    #[serde(default)]
    pub is_deactivated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// New profile for `user_id` with the column defaults applied.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            email: email.into(),
            name: DEFAULT_PROFILE_NAME.to_string(),
            country: None,
            lang: DEFAULT_LANG.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            is_onboard: false,
            role: Role::default(),
            trial_start_date: None,
            trial_end_date: None,
            secondary_email: None,
            is_deactivated: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a profile for the caller from a create request.
    ///
    /// An absent or `null` name both keep the default name; a stored profile
    /// always has one.
    pub fn from_request(user_id: &str, email: &str, request: CreateProfileRequest) -> Self {
        let mut profile = Self::new(user_id, email);
        if let Some(name) = request.name {
            profile.name = name;
        }
        if let Some(role) = request.role {
            profile.role = role;
        }
        if let Some(lang) = request.lang {
            profile.lang = lang;
        }
        if let Some(currency) = request.default_currency {
            profile.default_currency = currency.to_ascii_uppercase();
        }
        profile.trial_start_date = request.trial_start_date;
        profile.trial_end_date = request.trial_end_date;
        profile.is_onboard = request.is_onboard.unwrap_or(false);
        profile
    }

    /// Apply the fields present in `update` and bump `updated_at`.
    pub fn apply(&mut self, update: UpdateProfileRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.secondary_email {
            self.secondary_email = Some(email.trim().to_lowercase());
        }
        if let Some(country) = update.country {
            self.country = Some(country);
        }
        if let Some(date) = update.trial_start_date {
            self.trial_start_date = Some(date);
        }
        if let Some(date) = update.trial_end_date {
            self.trial_end_date = Some(date);
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(lang) = update.lang {
            self.lang = lang;
        }
        if let Some(currency) = update.default_currency {
            self.default_currency = currency.to_ascii_uppercase();
        }
        if let Some(is_onboard) = update.is_onboard {
            self.is_onboard = is_onboard;
        }
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /api/v1/profiles`. Identity comes from the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub role: Option<Role>,
    #[validate(length(min = 2, max = 3))]
    pub lang: Option<String>,
    #[validate(length(equal = 3))]
    pub default_currency: Option<String>,
    pub trial_start_date: Option<NaiveDate>,
    pub trial_end_date: Option<NaiveDate>,
    pub is_onboard: Option<bool>,
}

/// Body of `PUT /api/v1/profiles/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub secondary_email: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    pub trial_start_date: Option<NaiveDate>,
    pub trial_end_date: Option<NaiveDate>,
    pub role: Option<Role>,
    #[validate(length(min = 2, max = 3))]
    pub lang: Option<String>,
    #[validate(length(equal = 3))]
    pub default_currency: Option<String>,
    pub is_onboard: Option<bool>,
}

// =============================================================================
// Responses
// =============================================================================

/// Wrapper used by create and update responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileEnvelope {
    pub profile: Profile,
}

/// Result of a delete or deactivate call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_uses_column_defaults() {
        let profile = Profile::new("uid_1", "ana@example.com");
        assert_eq!(profile.lang, "en");
        assert_eq!(profile.default_currency, "EUR");
        assert_eq!(profile.role, Role::Guest);
        assert_eq!(profile.name, DEFAULT_PROFILE_NAME);
        assert!(!profile.is_deactivated);
        assert!(!profile.is_onboard);
    }

    #[test]
    fn from_request_overrides_defaults() {
        let request = CreateProfileRequest {
            name: Some("Ana".into()),
            role: Some(Role::User),
            default_currency: Some("usd".into()),
            is_onboard: Some(true),
            ..Default::default()
        };
        let profile = Profile::from_request("uid_1", "ana@example.com", request);
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.default_currency, "USD");
        assert!(profile.is_onboard);
        assert_eq!(profile.lang, "en");
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut profile = Profile::new("uid_1", "ana@example.com");
        profile.country = Some("Portugal".into());
        let before = profile.updated_at;

        profile.apply(UpdateProfileRequest {
            name: Some("Ana Sousa".into()),
            secondary_email: Some("  Ana@Work.Example ".into()),
            ..Default::default()
        });

        assert_eq!(profile.name, "Ana Sousa");
        assert_eq!(profile.secondary_email.as_deref(), Some("ana@work.example"));
        assert_eq!(profile.country.as_deref(), Some("Portugal"));
        assert!(profile.updated_at >= before);
    }

    #[test]
    fn update_validation_rules() {
        let ok = UpdateProfileRequest {
            name: Some("Ana".into()),
            secondary_email: Some("ana@example.com".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let long_name = UpdateProfileRequest {
            name: Some("x".repeat(101)),
            ..Default::default()
        };
        assert!(long_name.validate().is_err());

        let bad_email = UpdateProfileRequest {
            secondary_email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(bad_email.validate().is_err());

        let empty_name = UpdateProfileRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn profile_json_is_camel_case() {
        let profile = Profile::new("uid_1", "ana@example.com");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["userId"], "uid_1");
        assert_eq!(json["defaultCurrency"], "EUR");
        assert_eq!(json["isDeactivated"], false);
        assert!(json.get("country").is_none());
    }
}
