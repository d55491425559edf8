use std::{marker::PhantomData, sync::Arc};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::{
    auth::{AdminRole, Claims, EditorRole, RequiredRole, SuperAdminRole, jwt::decode_token},
    error::AppError,
    state::AppState,
};

use super::auth::{RejectedToken, access_token_from};

pub const AUTH_REQUIRED: &str = "Autentikasi diperlukan";
pub const TOKEN_INVALID: &str = "Token tidak valid atau kedaluwarsa";

// Strict: missing and invalid tokens are both 401, with different messages.
impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(claims);
        }
        if parts.extensions.get::<RejectedToken>().is_some() {
            return Err(AppError::unauthorized(TOKEN_INVALID));
        }

        let token = access_token_from(&parts.headers)
            .ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))?;
        let claims = decode_token(&state.jwt, &token)?;
        parts.extensions.insert(claims.clone());
        Ok(claims)
    }
}

pub type AuthGuard = Claims;

/// Claims when a valid token came with the request; anonymous otherwise.
#[derive(Debug, Clone)]
pub struct OptionalClaims(pub Option<Claims>);

impl FromRequestParts<Arc<AppState>> for OptionalClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(Self(Some(claims)));
        }
        if parts.extensions.get::<RejectedToken>().is_some() {
            return Ok(Self(None));
        }
        let claims = access_token_from(&parts.headers)
            .and_then(|token| decode_token(&state.jwt, &token).ok());
        Ok(Self(claims))
    }
}

pub struct AuthRoleGuard<R: RequiredRole> {
    pub claims: Claims,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for AuthRoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let claims = Claims::from_request_parts(parts, state).await?;

        if !claims.role.satisfies(R::required()) {
            return Err(AppError::forbidden("Akses ditolak"));
        }

        Ok(Self {
            claims,
            _marker: PhantomData,
        })
    }
}

pub type EditorGuard = AuthRoleGuard<EditorRole>;
pub type AdminGuard = AuthRoleGuard<AdminRole>;
pub type SuperAdminGuard = AuthRoleGuard<SuperAdminRole>;
