// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pocketbook - bookkeeping profile service
//!
//! HTTP API over user profiles, guarded by bearer token authentication and
//! exact-match role checks.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and the static route table (Axum)
//! - `auth` - Token codec, claims and the request gates
//! - `config` - Environment configuration
//! - `storage` - Profile database (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
