// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Profile endpoints.
//!
//! A profile belongs to the identity in the token's `user_id`. Reads and
//! creates act on the caller's own profile; listing and hard deletes are
//! admin-only.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::routes::{Controller, Gate, RouteDescriptor, RouteMethod};
use super::validation::ValidatedJson;
use crate::auth::{Auth, Claims, CurrentProfile};
use crate::error::ApiError;
use crate::models::{
    CreateProfileRequest, Profile, ProfileEnvelope, StatusResponse, UpdateProfileRequest,
};
use crate::storage::ProfileStore;

pub const BASE_PATH: &str = "/api/v1/profiles";

const PROFILE_NOT_FOUND: &str = "Profile not found";
const UNAUTHORIZED_ACCESS: &str = "Unauthorized access";

pub fn routes() -> Controller {
    Controller::new(
        BASE_PATH,
        vec![
            RouteDescriptor::new(
                RouteMethod::Get,
                "",
                &[Gate::Authenticate, Gate::RequireAdmin],
                list_profiles,
            ),
            RouteDescriptor::new(
                RouteMethod::Get,
                "/details",
                &[Gate::Authenticate, Gate::AttachProfile],
                get_profile_details,
            ),
            RouteDescriptor::new(
                RouteMethod::Get,
                "/userid/{id}",
                &[Gate::Authenticate],
                get_profile_by_user_id,
            ),
            RouteDescriptor::new(RouteMethod::Post, "", &[Gate::Authenticate], create_profile),
            RouteDescriptor::new(RouteMethod::Put, "/{id}", &[Gate::Authenticate], update_profile),
            RouteDescriptor::new(
                RouteMethod::Delete,
                "/{id}",
                &[Gate::Authenticate, Gate::RequireAdmin],
                delete_profile,
            ),
            RouteDescriptor::new(
                RouteMethod::Delete,
                "/{id}/deactivate",
                &[Gate::Authenticate],
                deactivate_profile,
            ),
        ],
    )
}

/// The caller may act on `profile` if they own it or are an admin.
fn ensure_owner_or_admin(claims: &Claims, profile: &Profile) -> Result<(), ApiError> {
    if claims.user_id == profile.user_id || claims.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden(UNAUTHORIZED_ACCESS))
    }
}

fn find_owned_by(profiles: &ProfileStore, user_id: &str) -> Result<Profile, ApiError> {
    profiles
        .find_by_user_id(user_id)?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))
}

/// List every profile.
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All profiles", body = [Profile]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_profiles(
    State(profiles): State<Arc<ProfileStore>>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    Ok(Json(profiles.list()?))
}

/// Get the caller's own profile.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/details",
    tag = "Profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = Profile),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile_details(
    CurrentProfile(profile_id): CurrentProfile,
    State(profiles): State<Arc<ProfileStore>>,
) -> Result<Json<Profile>, ApiError> {
    profiles
        .get(profile_id.0)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))
}

/// Get the profile owned by a user id. Responds with `null` when there is none.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/userid/{id}",
    tag = "Profiles",
    params(("id" = String, Path, description = "Owner user id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile, or null when the user has none", body = Profile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile_by_user_id(
    Path(user_id): Path<String>,
    State(profiles): State<Arc<ProfileStore>>,
) -> Result<Json<Option<Profile>>, ApiError> {
    Ok(Json(profiles.find_by_user_id(&user_id)?))
}

/// Create the caller's profile, or return the existing one.
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "Profiles",
    request_body = CreateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Profile created or already present", body = ProfileEnvelope),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_profile(
    Auth(claims): Auth,
    State(profiles): State<Arc<ProfileStore>>,
    ValidatedJson(request): ValidatedJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileEnvelope>), ApiError> {
    if claims.user_id.is_empty() && claims.email.is_empty() {
        return Err(ApiError::bad_request("Bad Request missing fields"));
    }

    let profile = match profiles.find_by_user_id(&claims.user_id)? {
        Some(existing) => existing,
        None => {
            let profile = Profile::from_request(&claims.user_id, &claims.email, request);
            profiles.create(&profile)?;
            tracing::info!(profile_id = %profile.id, user_id = %profile.user_id, "profile created");
            profile
        }
    };

    Ok((StatusCode::CREATED, Json(ProfileEnvelope { profile })))
}

/// Update a profile by id. Only its owner may do this.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}",
    tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile id")),
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = ProfileEnvelope),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the profile owner"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_profile(
    Auth(claims): Auth,
    Path(id): Path<String>,
    State(profiles): State<Arc<ProfileStore>>,
    ValidatedJson(update): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    let current = Uuid::parse_str(&id)
        .ok()
        .map(|id| profiles.get(id))
        .transpose()?
        .flatten()
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;

    // The owner of a profile never changes, so the check holds for the write
    if claims.user_id != current.user_id {
        return Err(ApiError::forbidden(UNAUTHORIZED_ACCESS));
    }

    let profile = profiles.update_with(current.id, |profile| profile.apply(update))?;
    tracing::debug!(profile_id = %profile.id, "profile updated");

    Ok(Json(ProfileEnvelope { profile }))
}

/// Permanently delete the profile owned by a user id.
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{id}",
    tag = "Profiles",
    params(("id" = String, Path, description = "Owner user id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Delete result", body = StatusResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn delete_profile(
    Auth(claims): Auth,
    Path(user_id): Path<String>,
    State(profiles): State<Arc<ProfileStore>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let profile = find_owned_by(&profiles, &user_id)?;
    ensure_owner_or_admin(&claims, &profile)?;

    let status = profiles.delete(profile.id)?;
    tracing::info!(profile_id = %profile.id, by = %claims.user_id, "profile deleted");

    Ok(Json(StatusResponse {
        status,
        message: None,
    }))
}

/// Deactivate the profile owned by a user id. The record is kept.
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{id}/deactivate",
    tag = "Profiles",
    params(("id" = String, Path, description = "Owner user id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile deactivated", body = StatusResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn deactivate_profile(
    Auth(claims): Auth,
    Path(user_id): Path<String>,
    State(profiles): State<Arc<ProfileStore>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let profile = find_owned_by(&profiles, &user_id)?;
    ensure_owner_or_admin(&claims, &profile)?;

    profiles.deactivate(profile.id)?;
    tracing::info!(profile_id = %profile.id, by = %claims.user_id, "profile deactivated");

    Ok(Json(StatusResponse {
        status: true,
        message: Some("Profile deactivated successfully".to_string()),
    }))
}
