// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON body extractor with field validation.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// `Json<T>` that also runs `T::validate()`.
///
/// Body errors keep the status axum picked for them (400, 415 or 422).
/// Validation failures become a `400 validation_error` with the per-field
/// details.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::new(rejection.status(), "bad_request", rejection.body_text())
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpdateProfileRequest;
    use axum::http::{self, Request as HttpRequest, StatusCode};

    fn json_request(body: &str) -> HttpRequest<axum::body::Body> {
        HttpRequest::builder()
            .method(http::Method::PUT)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let req = json_request(r#"{"name": "Ana", "defaultCurrency": "usd"}"#);
        let ValidatedJson(update) = ValidatedJson::<UpdateProfileRequest>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(update.name.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let req = json_request("{not json");
        let err = ValidatedJson::<UpdateProfileRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "bad_request");
    }

    #[tokio::test]
    async fn invalid_field_is_validation_error() {
        let req = json_request(r#"{"secondaryEmail": "not-an-email"}"#);
        let err = ValidatedJson::<UpdateProfileRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "validation_error");
        assert!(err.details.unwrap()["secondary_email"].is_array());
    }
}
