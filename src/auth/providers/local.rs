use async_trait::async_trait;

use crate::{
    auth::password::verify_password,
    db::dao::UserDao,
    db::entities::user,
    error::AppError,
};

use super::{AuthProvider, AuthProviderId, Credentials};

pub const INVALID_CREDENTIALS: &str = "Email atau password salah";

/// Email + password against the stored bcrypt hash.
#[derive(Clone)]
pub struct LocalAuthProvider {
    users: UserDao,
}

impl LocalAuthProvider {
    pub fn new(users: UserDao) -> Self {
        Self { users }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Local
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<user::Model, AppError> {
        let Credentials::Password { email, password } = credentials else {
            return Err(AppError::bad_request("Email dan password diperlukan"));
        };

        let user = self
            .users
            .find_by_email(&normalize_email(&email))
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        let Some(password_hash) = user.password_hash.as_deref() else {
            return Err(AppError::bad_request(
                "Akun ini terdaftar melalui Google, silakan masuk dengan Google",
            ));
        };
        if !verify_password(&password, password_hash) {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        if !user.is_verified {
            return Err(AppError::forbidden("Email belum diverifikasi"));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, IntoMockRow, MockDatabase};
    use uuid::Uuid;

    use super::{INVALID_CREDENTIALS, LocalAuthProvider, normalize_email};
    use crate::{
        auth::{
            Role,
            password::hash_password,
            providers::{AuthProvider, AuthProviderId, Credentials},
        },
        db::dao::{DaoBase, UserDao},
        db::entities::user,
        error::AppError,
        test_helpers::user_model,
    };

    struct ProviderFixtureBuilder {
        mock: MockDatabase,
    }

    impl ProviderFixtureBuilder {
        fn new() -> Self {
            Self {
                mock: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn with_query_results<T, I, II>(mut self, sets: II) -> Self
        where
            T: IntoMockRow,
            I: IntoIterator<Item = T>,
            II: IntoIterator<Item = I>,
        {
            self.mock = self.mock.append_query_results(sets);
            self
        }

        fn build(self) -> LocalAuthProvider {
            let db = self.mock.into_connection();
            LocalAuthProvider::new(UserDao::new(&db))
        }
    }

    fn stored_user(password: &str, verified: bool) -> user::Model {
        let mut user = user_model(Uuid::new_v4(), "fatimah@example.com", Role::Viewer);
        user.password_hash = Some(hash_password(password).expect("hash should succeed"));
        user.is_verified = verified;
        user
    }

    fn password(email: &str, password: &str) -> Credentials {
        Credentials::Password {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn normalizes_email_case_and_whitespace() {
        assert_eq!(normalize_email("  Fatimah@Example.COM "), "fatimah@example.com");
    }

    #[tokio::test]
    async fn provider_id_is_local() {
        assert_eq!(ProviderFixtureBuilder::new().build().id(), AuthProviderId::Local);
    }

    #[tokio::test]
    async fn authenticates_verified_user_with_matching_password() {
        let user = stored_user("password123", true);
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([[user.clone()]])
            .build();

        let authenticated = provider
            .authenticate(password(" FATIMAH@example.com", "password123"))
            .await
            .expect("login should succeed");
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn rejects_unknown_email() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .build();

        let err = provider
            .authenticate(password("ghost@example.com", "password123"))
            .await
            .expect_err("login should fail");
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([[stored_user("password123", true)]])
            .build();

        let err = provider
            .authenticate(password("fatimah@example.com", "wrong-password"))
            .await
            .expect_err("login should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rejects_unverified_user_even_with_correct_password() {
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([[stored_user("password123", false)]])
            .build();

        let err = provider
            .authenticate(password("fatimah@example.com", "password123"))
            .await
            .expect_err("login should fail");
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.message(), "Email belum diverifikasi");
    }

    #[tokio::test]
    async fn points_google_only_accounts_to_google() {
        let mut user = stored_user("password123", true);
        user.password_hash = None;
        user.has_google_account = true;
        let provider = ProviderFixtureBuilder::new()
            .with_query_results([[user]])
            .build();

        let err = provider
            .authenticate(password("fatimah@example.com", "password123"))
            .await
            .expect_err("login should fail");
        assert!(err.message().contains("Google"));
    }

    #[tokio::test]
    async fn rejects_oauth_credentials() {
        let provider = ProviderFixtureBuilder::new().build();

        let err = provider
            .authenticate(Credentials::OAuthCode {
                code: "abc".to_string(),
            })
            .await
            .expect_err("wrong credential kind");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
