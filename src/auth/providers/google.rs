use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    auth::{OtpPurpose, Role},
    config::GoogleConfig,
    db::dao::{NewUser, OtpDao, UserDao},
    db::entities::user,
    error::AppError,
};

use super::{AuthProvider, AuthProviderId, Credentials, local::normalize_email};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// The HTTP half of the OAuth dance, split out so tests can fake Google.
#[async_trait]
pub trait GoogleOAuthClient: Send + Sync {
    fn authorization_url(&self, state: &str) -> Result<String, AppError>;

    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, AppError>;
}

#[derive(Clone)]
pub struct HttpGoogleClient {
    http: reqwest::Client,
    cfg: GoogleConfig,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl HttpGoogleClient {
    pub fn new(cfg: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }
}

#[async_trait]
impl GoogleOAuthClient for HttpGoogleClient {
    fn authorization_url(&self, state: &str) -> Result<String, AppError> {
        let url = reqwest::Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.cfg.client_id.as_str()),
                ("redirect_uri", self.cfg.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|err| AppError::internal_with_source("Gagal membuat URL Google", err))?;
        Ok(url.into())
    }

    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, AppError> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.cfg.client_id.as_str()),
                ("client_secret", self.cfg.client_secret.as_str()),
                ("redirect_uri", self.cfg.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| {
                tracing::warn!(error = %err, "google code exchange failed");
                AppError::unauthorized("Login Google gagal")
            })?
            .json()
            .await
            .map_err(|err| AppError::internal_with_source("Respons token Google tidak valid", err))?;

        self.http
            .get(USERINFO_URL)
            .bearer_auth(token.access_token)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| AppError::internal_with_source("Gagal mengambil profil Google", err))?
            .json::<GoogleProfile>()
            .await
            .map_err(|err| AppError::internal_with_source("Profil Google tidak valid", err))
    }
}

#[derive(Clone)]
pub struct GoogleAuthProvider {
    client: Arc<dyn GoogleOAuthClient>,
    users: UserDao,
    otps: OtpDao,
}

impl GoogleAuthProvider {
    pub fn new(client: Arc<dyn GoogleOAuthClient>, users: UserDao, otps: OtpDao) -> Self {
        Self {
            client,
            users,
            otps,
        }
    }

    /// Links the Google identity to an existing account or creates a password-less one.
    async fn link_or_create(&self, profile: GoogleProfile) -> Result<user::Model, AppError> {
        let email = normalize_email(&profile.email);
        if let Some(mut existing) = self.users.find_by_email(&email).await? {
            if !existing.has_google_account || !existing.is_verified {
                let was_verified = existing.is_verified;
                self.users
                    .link_google_account(existing.id, was_verified)
                    .await?;
                if !was_verified {
                    // Whoever registered this address never proved they own it.
                    self.otps
                        .invalidate_unused(existing.id, OtpPurpose::Register)
                        .await?;
                    existing.password_hash = None;
                }
                existing.has_google_account = true;
                existing.is_verified = true;
                tracing::info!(user_id = %existing.id, was_verified, "google account linked");
            }
            return Ok(existing);
        }

        let fullname = profile
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.clone());
        let user = self
            .users
            .create_user(NewUser {
                email,
                fullname,
                password_hash: None,
                role: Role::Viewer,
                is_verified: true,
                has_google_account: true,
            })
            .await?;
        tracing::info!(user_id = %user.id, "user registered through google");
        Ok(user)
    }
}

#[async_trait]
impl AuthProvider for GoogleAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Google
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<user::Model, AppError> {
        let Credentials::OAuthCode { code } = credentials else {
            return Err(AppError::bad_request("Kode otorisasi Google diperlukan"));
        };
        if code.trim().is_empty() {
            return Err(AppError::bad_request("Kode otorisasi Google diperlukan"));
        }

        let profile = self.client.fetch_profile(&code).await?;
        if !profile.email_verified {
            return Err(AppError::unauthorized("Email Google belum diverifikasi"));
        }
        self.link_or_create(profile).await
    }

    fn authorization_url(&self, state: &str) -> Option<String> {
        match self.client.authorization_url(state) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!(error = %err, "google authorization url unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::{GoogleAuthProvider, GoogleOAuthClient, GoogleProfile, HttpGoogleClient};
    use crate::db::dao::OtpDao;
    use crate::{
        auth::{
            Role,
            providers::{AuthProvider, Credentials},
        },
        config::GoogleConfig,
        db::dao::{DaoBase, UserDao},
        db::entities::user,
        error::AppError,
        test_helpers::user_model,
    };

    pub(crate) struct FakeGoogle {
        pub profile: GoogleProfile,
    }

    #[async_trait]
    impl GoogleOAuthClient for FakeGoogle {
        fn authorization_url(&self, state: &str) -> Result<String, AppError> {
            Ok(format!("https://accounts.example/consent?state={state}"))
        }

        async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, AppError> {
            if code == "bad-code" {
                return Err(AppError::unauthorized("Login Google gagal"));
            }
            Ok(self.profile.clone())
        }
    }

    fn profile(email: &str, verified: bool) -> GoogleProfile {
        GoogleProfile {
            email: email.to_string(),
            email_verified: verified,
            name: Some("Hasan Basri".to_string()),
            picture: None,
        }
    }

    fn provider(db: MockDatabase, profile: GoogleProfile) -> GoogleAuthProvider {
        let db = db.into_connection();
        GoogleAuthProvider::new(
            Arc::new(FakeGoogle { profile }),
            UserDao::new(&db),
            OtpDao::new(&db),
        )
    }

    fn code(value: &str) -> Credentials {
        Credentials::OAuthCode {
            code: value.to_string(),
        }
    }

    #[test]
    fn http_client_builds_consent_url_with_state() {
        let client = HttpGoogleClient::new(GoogleConfig {
            client_id: "client-1".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "http://localhost:3000/api/auth/google/callback".to_string(),
        });

        let url = client
            .authorization_url("state-123")
            .expect("url should build");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("state=state-123"));
        assert!(url.contains("response_type=code"));
    }

    #[tokio::test]
    async fn creates_passwordless_verified_user_for_new_email() {
        let mut created = user_model(Uuid::new_v4(), "hasan@example.com", Role::Viewer);
        created.password_hash = None;
        created.has_google_account = true;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[created.clone()]]);

        let user = provider(db, profile("Hasan@Example.com", true))
            .authenticate(code("good-code"))
            .await
            .expect("google login should succeed");
        assert_eq!(user.id, created.id);
        assert!(user.password_hash.is_none());
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn links_verified_account_and_keeps_password() {
        let mut existing = user_model(Uuid::new_v4(), "hasan@example.com", Role::Editor);
        existing.password_hash = Some("owner-hash".to_string());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .append_exec_results([exec(1)]);

        let user = provider(db, profile("hasan@example.com", true))
            .authenticate(code("good-code"))
            .await
            .expect("google login should succeed");
        assert_eq!(user.id, existing.id);
        assert!(user.has_google_account);
        assert!(user.is_verified);
        assert_eq!(user.role, "EDITOR");
        assert_eq!(user.password_hash.as_deref(), Some("owner-hash"));
    }

    #[tokio::test]
    async fn linking_unverified_account_drops_squatter_password() {
        let mut existing = user_model(Uuid::new_v4(), "hasan@example.com", Role::Viewer);
        existing.is_verified = false;
        existing.password_hash = Some("squatter-hash".to_string());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .append_exec_results([exec(1), exec(2)])
            .into_connection();
        let provider = GoogleAuthProvider::new(
            Arc::new(FakeGoogle {
                profile: profile("hasan@example.com", true),
            }),
            UserDao::new(&db),
            OtpDao::new(&db),
        );

        let user = provider
            .authenticate(code("good-code"))
            .await
            .expect("google login should succeed");
        assert!(user.is_verified);
        assert!(user.password_hash.is_none());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("password_hash"), "{log}");
        assert!(log.contains("otp_verifications"), "{log}");
    }

    #[tokio::test]
    async fn rejects_unverified_google_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let err = provider(db, profile("hasan@example.com", false))
            .authenticate(code("good-code"))
            .await
            .expect_err("unverified google email should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn surfaces_exchange_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let err = provider(db, profile("hasan@example.com", true))
            .authenticate(code("bad-code"))
            .await
            .expect_err("exchange should fail");
        assert_eq!(err.message(), "Login Google gagal");
    }
}
