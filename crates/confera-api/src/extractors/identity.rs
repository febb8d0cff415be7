//! Caller identity extractors.
//!
//! Authentication is handled by the upstream gateway, which forwards the
//! verified identity as headers: `X-User-Id` for every caller and
//! `X-Admin: true` when the caller holds the admin role. The engine never
//! sees credentials.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use confera_core::error::AppError;
use confera_core::types::id::UserId;

use crate::error::ApiError;

const USER_HEADER: &str = "x-user-id";
const ADMIN_HEADER: &str = "x-admin";

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub UserId);

/// An authenticated caller with the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminIdentity(pub UserId);

fn user_id_from_parts(parts: &Parts) -> Result<UserId, ApiError> {
    let value = parts
        .headers
        .get(USER_HEADER)
        .ok_or_else(|| ApiError::from(AppError::validation("Missing X-User-Id header")))?
        .to_str()
        .map_err(|_| ApiError::from(AppError::validation("Malformed X-User-Id header")))?;

    value
        .parse::<UserId>()
        .map_err(|_| ApiError::from(AppError::validation("X-User-Id is not a valid UUID")))
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_id_from_parts(parts).map(Self)
    }
}

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = user_id_from_parts(parts)?;

        let is_admin = parts
            .headers
            .get(ADMIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if !is_admin {
            return Err(ApiError::from(AppError::forbidden(
                "Administrator role required",
            )));
        }

        Ok(Self(user_id))
    }
}
