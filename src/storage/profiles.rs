// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded profile database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `profiles`: profile id → serialized Profile (JSON bytes)
//! - `profile_owner_index`: user_id → profile id
//! - `profile_email_index`: lowercase email → profile id
//!
//! Both indexes enforce uniqueness; every write keeps them in step with the
//! primary table inside a single write transaction.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::models::Profile;

// =============================================================================
// Table Definitions
// =============================================================================

const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

const PROFILE_OWNER_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("profile_owner_index");

const PROFILE_EMAIL_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("profile_email_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// ProfileStore
// =============================================================================

/// Profile persistence handle.
///
/// Built once at startup and shared through [`AppState`](crate::state::AppState);
/// the profile gate and the profile handlers only ever reach storage
/// through it.
pub struct ProfileStore {
    db: Database,
}

impl ProfileStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PROFILES)?;
            let _ = write_txn.open_table(PROFILE_OWNER_INDEX)?;
            let _ = write_txn.open_table(PROFILE_EMAIL_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a new profile.
    ///
    /// Fails with `AlreadyExists` if the id, owner or email is taken.
    pub fn create(&self, profile: &Profile) -> StoreResult<()> {
        let id = profile.id.to_string();
        let email = email_key(&profile.email);
        let json = serde_json::to_vec(profile)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut profiles = write_txn.open_table(PROFILES)?;
            let mut owners = write_txn.open_table(PROFILE_OWNER_INDEX)?;
            let mut emails = write_txn.open_table(PROFILE_EMAIL_INDEX)?;

            if profiles.get(id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("Profile {id}")));
            }
            if owners.get(profile.user_id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "Profile for user {}",
                    profile.user_id
                )));
            }
            if emails.get(email.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("Profile with email {email}")));
            }

            profiles.insert(id.as_str(), json.as_slice())?;
            owners.insert(profile.user_id.as_str(), id.as_str())?;
            emails.insert(email.as_str(), id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a profile by its internal id.
    pub fn get(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROFILES)?;
        let key = id.to_string();
        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up the profile owned by `user_id`.
    pub fn find_by_user_id(&self, user_id: &str) -> StoreResult<Option<Profile>> {
        let read_txn = self.db.begin_read()?;
        let owners = read_txn.open_table(PROFILE_OWNER_INDEX)?;
        let Some(id) = owners.get(user_id)? else {
            return Ok(None);
        };

        let profiles = read_txn.open_table(PROFILES)?;
        match profiles.get(id.value())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => {
                tracing::warn!(user_id, "owner index points at a missing profile");
                Ok(None)
            }
        }
    }

    /// All profiles, in id order.
    pub fn list(&self) -> StoreResult<Vec<Profile>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROFILES)?;

        let mut profiles = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            profiles.push(serde_json::from_slice(value.value())?);
        }
        Ok(profiles)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROFILES)?;
        let mut count = 0;
        for entry in table.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Read, modify and write back a profile in one write transaction.
    ///
    /// `apply` sees the committed record, so concurrent writers cannot lose
    /// each other's fields. The id and owner (`user_id`) never change; the
    /// email index follows email changes and rejects collisions.
    pub fn update_with<F>(&self, id: Uuid, apply: F) -> StoreResult<Profile>
    where
        F: FnOnce(&mut Profile),
    {
        let key = id.to_string();

        let write_txn = self.db.begin_write()?;
        let profile = {
            let mut profiles = write_txn.open_table(PROFILES)?;
            let mut emails = write_txn.open_table(PROFILE_EMAIL_INDEX)?;

            let existing: Profile = {
                let stored = profiles
                    .get(key.as_str())?
                    .ok_or_else(|| StoreError::NotFound(format!("Profile {key}")))?;
                serde_json::from_slice(stored.value())?
            };

            let mut profile = existing.clone();
            apply(&mut profile);
            profile.id = existing.id;
            profile.user_id = existing.user_id.clone();

            let old_email = email_key(&existing.email);
            let new_email = email_key(&profile.email);
            if old_email != new_email {
                let taken = emails
                    .get(new_email.as_str())?
                    .is_some_and(|owner| owner.value() != key);
                if taken {
                    return Err(StoreError::AlreadyExists(format!(
                        "Profile with email {new_email}"
                    )));
                }
                emails.remove(old_email.as_str())?;
                emails.insert(new_email.as_str(), key.as_str())?;
            }

            let json = serde_json::to_vec(&profile)?;
            profiles.insert(key.as_str(), json.as_slice())?;
            profile
        };
        write_txn.commit()?;
        Ok(profile)
    }

    /// Mark a profile deactivated without removing it.
    pub fn deactivate(&self, id: Uuid) -> StoreResult<Profile> {
        self.update_with(id, |profile| {
            profile.is_deactivated = true;
            profile.updated_at = chrono::Utc::now();
        })
    }

    /// Remove a profile and its index entries. Returns whether it existed.
    pub fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let key = id.to_string();

        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut profiles = write_txn.open_table(PROFILES)?;
            let removed: Option<Profile> = match profiles.remove(key.as_str())? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };

            if let Some(profile) = &removed {
                let mut owners = write_txn.open_table(PROFILE_OWNER_INDEX)?;
                owners.remove(profile.user_id.as_str())?;
                let mut emails = write_txn.open_table(PROFILE_EMAIL_INDEX)?;
                emails.remove(email_key(&profile.email).as_str())?;
            }
            removed.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Open a read transaction against the profiles table.
    pub fn health_check(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(PROFILES)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
