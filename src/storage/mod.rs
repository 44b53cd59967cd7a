// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Profile records live in an embedded redb database under `DATA_DIR`.
//! The store is opened once in `main` and handed to the application state;
//! nothing else opens the database file.

pub mod profiles;

pub use profiles::{ProfileStore, StoreError, StoreResult};
