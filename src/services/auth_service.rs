use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{
        OtpPurpose, Role,
        jwt::{encode_token, make_access_claims},
        password::hash_password,
        providers::{AuthProviderId, Credentials, local::normalize_email},
        tokens::{generate_opaque_token, generate_otp},
    },
    db::dao::{DaoBase, DaoContext, NewUser},
    db::entities::user,
    error::AppError,
    mail::{
        OutgoingMail,
        templates::{OtpEmail, ResetPasswordEmail, render},
    },
    services::{
        session_service::SessionService,
        user_service::{UserView, role_of},
    },
    state::AppState,
};

pub const EMAIL_TAKEN: &str = "Email sudah terdaftar";
pub const INVALID_OTP: &str = "Kode OTP tidak valid atau sudah digunakan";
pub const EXPIRED_OTP: &str = "Kode OTP sudah kedaluwarsa";
pub const WRONG_OTP: &str = "Kode OTP salah";
pub const OTP_LOCKED: &str = "Terlalu banyak percobaan, silakan minta kode OTP baru";
pub const INVALID_RESET_TOKEN: &str = "Token reset tidak valid atau kedaluwarsa";

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub fullname: String,
    pub password: String,
}

/// What a successful login or refresh hands back to the route layer.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(skip)]
    pub session_token: String,
    pub user: UserView,
    #[serde(rename = "requiresGoogle")]
    pub requires_google: bool,
}

pub struct AuthService<'a> {
    state: &'a AppState,
    daos: DaoContext,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            daos: DaoContext::new(&state.db),
        }
    }

    fn sessions(&self) -> SessionService {
        SessionService::new(self.daos.session(), self.state.auth.session_ttl_days)
    }

    pub async fn register(&self, input: RegisterInput) -> Result<UserView, AppError> {
        let email = normalize_email(&input.email);
        let fullname = input.fullname.trim().to_string();
        if email.is_empty() || fullname.is_empty() {
            return Err(AppError::bad_request("Email dan nama lengkap wajib diisi"));
        }

        let users = self.daos.user();
        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(&input.password)?;
        let user = users
            .create_user(NewUser {
                email,
                fullname,
                password_hash: Some(password_hash),
                role: Role::Viewer,
                is_verified: false,
                has_google_account: false,
            })
            .await?;
        tracing::info!(user_id = %user.id, "user registered");

        self.issue_register_otp(&user).await?;
        Ok(user.into())
    }

    async fn issue_register_otp(&self, user: &user::Model) -> Result<(), AppError> {
        let code = generate_otp();
        let ttl = self.state.auth.otp_ttl_minutes;
        let expires_at = Utc::now().fixed_offset() + Duration::minutes(ttl);
        self.daos
            .otp()
            .create_code(user.id, &code, OtpPurpose::Register, expires_at)
            .await?;

        let html = render(&OtpEmail {
            fullname: &user.fullname,
            code: &code,
            ttl_minutes: ttl,
        })?;
        self.state
            .mailer
            .send(OutgoingMail {
                to: user.email.clone(),
                subject: "Kode verifikasi Masjid Info".to_string(),
                html,
            })
            .await
            .inspect_err(|_| tracing::warn!(user_id = %user.id, "otp email not delivered"))?;
        tracing::info!(user_id = %user.id, "otp issued");
        Ok(())
    }

    /// Only the newest unused REGISTER code counts; wrong guesses burn it eventually.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<UserView, AppError> {
        let users = self.daos.user();
        let mut user = users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::bad_request(INVALID_OTP))?;
        if user.is_verified {
            return Err(AppError::bad_request("Email sudah diverifikasi"));
        }

        let otps = self.daos.otp();
        let otp = otps
            .find_latest_unused(user.id, OtpPurpose::Register)
            .await?
            .ok_or_else(|| AppError::bad_request(INVALID_OTP))?;
        if otp.expires_at <= Utc::now().fixed_offset() {
            return Err(AppError::bad_request(EXPIRED_OTP));
        }

        if otp.code != code.trim() {
            let attempts = otp.attempts + 1;
            tracing::info!(user_id = %user.id, attempts, "otp verification failed");
            if attempts >= self.state.auth.otp_max_attempts {
                otps.mark_used(otp.id).await?;
                return Err(AppError::bad_request(OTP_LOCKED));
            }
            otps.set_attempts(otp.id, attempts).await?;
            return Err(AppError::bad_request(WRONG_OTP));
        }

        users.mark_verified(user.id).await?;
        otps.mark_used(otp.id).await?;
        tracing::info!(user_id = %user.id, "email verified");
        user.is_verified = true;
        Ok(user.into())
    }

    pub async fn resend_otp(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .daos
            .user()
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found("Pengguna tidak ditemukan"))?;
        if user.is_verified {
            return Err(AppError::bad_request("Email sudah diverifikasi"));
        }

        self.daos
            .otp()
            .invalidate_unused(user.id, OtpPurpose::Register)
            .await?;
        self.issue_register_otp(&user).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = self
            .state
            .auth_providers
            .get(AuthProviderId::Local)?
            .authenticate(Credentials::Password {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        tracing::info!(user_id = %user.id, provider = "local", "login");
        self.start_session(user).await
    }

    pub fn google_authorization_url(&self, state: &str) -> Result<String, AppError> {
        self.state
            .auth_providers
            .get(AuthProviderId::Google)?
            .authorization_url(state)
            .ok_or_else(|| AppError::internal("Login Google tidak tersedia"))
    }

    pub async fn google_login(&self, code: &str) -> Result<LoginOutcome, AppError> {
        let user = self
            .state
            .auth_providers
            .get(AuthProviderId::Google)?
            .authenticate(Credentials::OAuthCode {
                code: code.to_string(),
            })
            .await?;
        tracing::info!(user_id = %user.id, provider = "google", "login");
        self.start_session(user).await
    }

    fn access_token_for(&self, user: &user::Model) -> Result<String, AppError> {
        let claims = make_access_claims(
            &user.id,
            &user.email,
            role_of(user),
            self.state.auth.access_token_ttl_secs as usize,
        );
        encode_token(&self.state.jwt, &claims)
    }

    async fn start_session(&self, user: user::Model) -> Result<LoginOutcome, AppError> {
        let access_token = self.access_token_for(&user)?;
        let session = self.sessions().create_session(user.id).await?;
        Ok(LoginOutcome {
            access_token,
            session_token: session.session_token,
            requires_google: !user.has_google_account,
            user: user.into(),
        })
    }

    /// Rotates the session and mints a new access token.
    pub async fn refresh(&self, session_token: &str) -> Result<LoginOutcome, AppError> {
        let session = self.sessions().rotate(session_token).await?;
        let user = self
            .daos
            .user()
            .find_by_id(session.user_id)
            .await
            .map_err(|_| AppError::unauthorized("Sesi tidak valid atau kedaluwarsa"))?;
        Ok(LoginOutcome {
            access_token: self.access_token_for(&user)?,
            session_token: session.session_token,
            requires_google: !user.has_google_account,
            user: user.into(),
        })
    }

    /// Tolerates an unknown or missing session.
    pub async fn logout(&self, session_token: Option<&str>) -> Result<(), AppError> {
        if let Some(token) = session_token {
            self.sessions().revoke_session(token).await?;
        }
        Ok(())
    }

    /// Always succeeds so the endpoint cannot be used to probe for accounts.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self
            .daos
            .user()
            .find_by_email(&normalize_email(email))
            .await?
        else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let otps = self.daos.otp();
        otps.invalidate_unused(user.id, OtpPurpose::ForgotPassword)
            .await?;
        let token = generate_opaque_token();
        let ttl = self.state.auth.reset_token_ttl_minutes;
        let expires_at = Utc::now().fixed_offset() + Duration::minutes(ttl);
        otps.create_code(user.id, &token, OtpPurpose::ForgotPassword, expires_at)
            .await?;

        let reset_url = format!(
            "{}/reset-password?token={token}",
            self.state.config.general.client_url.trim_end_matches('/')
        );
        let html = render(&ResetPasswordEmail {
            fullname: &user.fullname,
            reset_url: &reset_url,
            ttl_minutes: ttl,
        })?;
        self.state
            .mailer
            .send(OutgoingMail {
                to: user.email.clone(),
                subject: "Atur ulang password Masjid Info".to_string(),
                html,
            })
            .await?;
        tracing::info!(user_id = %user.id, "password reset issued");
        Ok(())
    }

    /// Single use; every session of the user is revoked afterwards.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let otps = self.daos.otp();
        let reset = otps
            .find_by_code(token.trim(), OtpPurpose::ForgotPassword)
            .await?
            .filter(|row| !row.is_used && row.expires_at > Utc::now().fixed_offset())
            .ok_or_else(|| AppError::bad_request(INVALID_RESET_TOKEN))?;

        let password_hash = hash_password(new_password)?;
        self.daos
            .user()
            .set_password_hash(reset.user_id, &password_hash)
            .await?;
        otps.mark_used(reset.id).await?;
        self.sessions().revoke_all(reset.user_id).await?;
        tracing::info!(user_id = %reset.user_id, "password reset");
        Ok(())
    }

    /// First password for an account that so far only signed in with Google.
    pub async fn set_password(&self, user_id: Uuid, password: &str) -> Result<(), AppError> {
        let users = self.daos.user();
        let user = users.find_by_id(user_id).await?;
        if user.password_hash.is_some() {
            return Err(AppError::bad_request("Password sudah diatur"));
        }
        let password_hash = hash_password(password)?;
        users.set_password_hash(user_id, &password_hash).await?;
        tracing::info!(%user_id, "password set");
        Ok(())
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<UserView, AppError> {
        Ok(self.daos.user().find_by_id(user_id).await?.into())
    }
}
