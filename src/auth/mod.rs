// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token handling and the request gates for the Pocketbook API.
//!
//! ## Auth Flow
//!
//! 1. The client obtains an HS256 token carrying `user_id`, `email`, `role`
//!    and `aud` claims
//! 2. The client sends `Authorization: Bearer <token>`
//! 3. The server:
//!    - decodes the token and checks `aud` against `AUTH_AUDIENCE`
//!    - stores the [`Claims`] in the request extensions
//!    - optionally checks the role tag and resolves the caller's profile
//!
//! ## Security
//!
//! - Every route except the base path and health probes is gated
//! - Roles are matched exactly
//! - Signatures are only verified when `AUTH_VERIFY_SIGNATURES=true`

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod roles;
pub mod token;

pub use claims::{Claims, ProfileId};
pub use error::AuthError;
pub use extractor::{Auth, CurrentProfile};
pub use roles::Role;
pub use token::{SignOptions, TokenCodec, Verification};
