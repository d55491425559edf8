use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::{
    auth::{
        cookies::{self, OAUTH_STATE_COOKIE, REFRESH_COOKIE},
        tokens::generate_opaque_token,
    },
    error::AppError,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        auth_service::{LoginOutcome, RegisterInput},
        user_service::UserView,
    },
    state::AppState,
};

use super::validated;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Nama lengkap wajib diisi"))]
    pub fullname: String,
    #[validate(length(min = 8, message = "Password minimal 8 karakter"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
    #[validate(length(equal = 6, message = "Kode OTP harus 6 digit"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token wajib diisi"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password minimal 8 karakter"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 8, message = "Password minimal 8 karakter"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/set-password", post(set_password))
        .route("/auth/me", get(me))
        .route("/auth/google", get(google_start))
        .route("/auth/google/callback", get(google_callback))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<UserView> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let user = services
        .auth(&state)
        .register(RegisterInput {
            email: body.email,
            fullname: body.fullname,
            password: body.password,
        })
        .await?;
    JsonApiResponse::created("Registrasi berhasil, kode OTP telah dikirim ke email", user)
}

async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyOtpRequest>,
) -> ApiResult<UserView> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let user = services.auth(&state).verify_otp(&body.email, &body.code).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Email berhasil diverifikasi", user)
}

async fn resend_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<()> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    services.auth(&state).resend_otp(&body.email).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Kode OTP baru telah dikirim", ())
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, JsonApiResponse<LoginOutcome>), AppError> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    let outcome = services.auth(&state).login(&body.email, &body.password).await?;
    signed_in(&state, jar, outcome, "Login berhasil")
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<()> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    services.auth(&state).forgot_password(&body.email).await?;
    JsonApiResponse::with_status(
        StatusCode::OK,
        "Jika email terdaftar, tautan reset password telah dikirim",
        (),
    )
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<()> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    services
        .auth(&state)
        .reset_password(&body.token, &body.password)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Password berhasil diubah", ())
}

async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, JsonApiResponse<()>), AppError> {
    let session_token = cookies::read(&jar, REFRESH_COOKIE);
    let services = ServiceContext::from_state(&state);
    services.auth(&state).logout(session_token.as_deref()).await?;
    let response = JsonApiResponse::with_status(StatusCode::OK, "Logout berhasil", ())?;
    Ok((cookies::without_auth_cookies(jar), response))
}

async fn refresh_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, JsonApiResponse<LoginOutcome>), AppError> {
    let session_token = cookies::read(&jar, REFRESH_COOKIE)
        .ok_or_else(|| AppError::unauthorized("Sesi tidak valid atau kedaluwarsa"))?;
    let services = ServiceContext::from_state(&state);
    let outcome = services.auth(&state).refresh(&session_token).await?;
    signed_in(&state, jar, outcome, "Token diperbarui")
}

async fn set_password(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<SetPasswordRequest>,
) -> ApiResult<()> {
    let body = validated(body)?;
    let services = ServiceContext::from_state(&state);
    services
        .auth(&state)
        .set_password(claims.user_id()?, &body.password)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Password berhasil diatur", ())
}

async fn me(State(state): State<Arc<AppState>>, claims: AuthGuard) -> ApiResult<UserView> {
    let services = ServiceContext::from_state(&state);
    let user = services.auth(&state).current_user(claims.user_id()?).await?;
    JsonApiResponse::ok(user)
}

async fn google_start(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let oauth_state = generate_opaque_token();
    let services = ServiceContext::from_state(&state);
    let url = services.auth(&state).google_authorization_url(&oauth_state)?;
    Ok((
        cookies::with_oauth_state(jar, &state.auth, &oauth_state),
        Redirect::to(&url),
    ))
}

/// Browser flow: failures land on the client login page instead of a JSON body.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<GoogleCallbackQuery>,
) -> (CookieJar, Redirect) {
    let client_url = state.config.general.client_url.trim_end_matches('/').to_string();
    let expected_state = cookies::read(&jar, OAUTH_STATE_COOKIE);
    let jar = cookies::without_oauth_state(jar);

    let code = match check_callback(&query, expected_state.as_deref()) {
        Ok(code) => code,
        Err(err) => {
            tracing::warn!(reason = %err, "google callback rejected");
            return (jar, Redirect::to(&format!("{client_url}/login?error=google")));
        }
    };

    let services = ServiceContext::from_state(&state);
    match services.auth(&state).google_login(code).await {
        Ok(outcome) => {
            let jar = cookies::with_auth_cookies(
                jar,
                &state.auth,
                &outcome.access_token,
                &outcome.session_token,
            );
            (jar, Redirect::to(&client_url))
        }
        Err(err) => {
            tracing::warn!(reason = %err, "google login failed");
            (jar, Redirect::to(&format!("{client_url}/login?error=google")))
        }
    }
}

fn check_callback<'q>(
    query: &'q GoogleCallbackQuery,
    expected_state: Option<&str>,
) -> Result<&'q str, AppError> {
    if let Some(error) = query.error.as_deref() {
        return Err(AppError::bad_request(format!("Google menolak login: {error}")));
    }
    let state_matches = match (query.state.as_deref(), expected_state) {
        (Some(got), Some(expected)) => got == expected,
        _ => false,
    };
    if !state_matches {
        return Err(AppError::bad_request("State OAuth tidak valid"));
    }
    query
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::bad_request("Kode otorisasi tidak ditemukan"))
}

fn signed_in(
    state: &AppState,
    jar: CookieJar,
    outcome: LoginOutcome,
    message: &str,
) -> Result<(CookieJar, JsonApiResponse<LoginOutcome>), AppError> {
    let jar = cookies::with_auth_cookies(
        jar,
        &state.auth,
        &outcome.access_token,
        &outcome.session_token,
    );
    let response = JsonApiResponse::with_status(StatusCode::OK, message, outcome)?;
    Ok((jar, response))
}

#[cfg(test)]
mod tests {
    use super::{GoogleCallbackQuery, check_callback};

    fn query(code: Option<&str>, state: Option<&str>) -> GoogleCallbackQuery {
        GoogleCallbackQuery {
            code: code.map(str::to_string),
            state: state.map(str::to_string),
            error: None,
        }
    }

    #[test]
    fn callback_requires_matching_state() {
        let q = query(Some("abc"), Some("s1"));
        assert_eq!(check_callback(&q, Some("s1")).expect("state matches"), "abc");
        assert!(check_callback(&q, Some("s2")).is_err());
        assert!(check_callback(&q, None).is_err());
    }

    #[test]
    fn callback_requires_code() {
        let q = query(None, Some("s1"));
        assert!(check_callback(&q, Some("s1")).is_err());
    }

    #[test]
    fn callback_surfaces_provider_error() {
        let mut q = query(Some("abc"), Some("s1"));
        q.error = Some("access_denied".to_string());
        let err = check_callback(&q, Some("s1")).expect_err("provider error wins");
        assert!(err.message().contains("access_denied"));
    }
}
