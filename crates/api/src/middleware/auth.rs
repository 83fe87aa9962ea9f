//! # Authentication Module
//!
//! Request extractors that turn the `Authorization` header into a verified
//! [`Identity`]. Every scheduling endpoint takes one of them:
//!
//! - [`Caller`]: any authenticated identity
//! - [`AdminCaller`]: an identity allowed to manage timetables
//!
//! The header may carry `Bearer <token>` or the bare token.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use scheduling_core::{
    errors::{AuthError, SchedulingError},
    models::identity::Identity,
};
use tracing::debug;

use crate::{ApiState, middleware::error_handling::AppError};

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub Identity);

/// Pulls the credential out of the `Authorization` header.
pub fn bearer_credential(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::InvalidCredential("authorization header is not ASCII".into()))?
        .trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let credential = bearer_credential(&parts.headers)?;

        let identity = state.verifier.validate(credential).await.map_err(|e| {
            debug!("Rejected credential: {}", e);
            AppError::from(e)
        })?;

        Ok(Caller(identity))
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let Caller(identity) = Caller::from_request_parts(parts, state).await?;

        if !identity.can_manage_timetables() {
            return Err(AppError(SchedulingError::Forbidden(format!(
                "user {} may not manage timetables",
                identity.subject_id
            ))));
        }

        Ok(AdminCaller(identity))
    }
}
