// ABOUTME: Caller identity extraction from the trusted session header
// ABOUTME: The upstream credential service forwards the authenticated user id as x-user-id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::errors::AppError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolve the calling user from request headers
///
/// # Errors
///
/// Returns `AuthRequired` when the header is absent and `AuthInvalid` when it
/// is not a UUID
pub fn authenticate_user(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("User id header is not valid text"))?;

    Uuid::parse_str(raw.trim())
        .map_err(|e| AppError::auth_invalid(format!("User id header is not a UUID: {e}")))
}
