// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role tag carried in the token claims and on profile records.
///
/// ## Roles
///
/// - `Guest` - Signed in, trial or not yet onboarded
/// - `User` - Regular bookkeeping user
/// - `Admin` - Operator access (profile listing, hard delete)
///
/// Roles are matched exactly, there is no hierarchy: an admin does not
/// satisfy a route gated on `User`. `Guest` is the least privileged tag and
/// the default for new profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[default]
    #[serde(rename = "GUEST", alias = "guest")]
    Guest,
    #[serde(rename = "USER", alias = "user")]
    User,
    #[serde(rename = "ADMIN", alias = "admin")]
    Admin,
}

impl Role {
    /// Whether this role satisfies a gate requiring `required`.
    pub fn permits(&self, required: Role) -> bool {
        *self == required
    }

    /// Parse role from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_ascii_uppercase().as_str() {
            "GUEST" => Some(Role::Guest),
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
