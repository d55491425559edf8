use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{db::entities::user, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderId {
    Local,
    Google,
}

impl AuthProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProviderId::Local => "local",
            AuthProviderId::Google => "google",
        }
    }
}

impl std::str::FromStr for AuthProviderId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "local" => Ok(AuthProviderId::Local),
            "google" => Ok(AuthProviderId::Google),
            other => Err(format!("unsupported auth provider: {other}")),
        }
    }
}

/// What a client proves its identity with.
#[derive(Debug, Clone)]
pub enum Credentials {
    Password { email: String, password: String },
    OAuthCode { code: String },
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn id(&self) -> AuthProviderId;

    /// Resolves credentials to a user allowed to start a session.
    async fn authenticate(&self, credentials: Credentials) -> Result<user::Model, AppError>;

    /// Consent page for redirect-based providers.
    fn authorization_url(&self, _state: &str) -> Option<String> {
        None
    }
}

#[derive(Clone, Default)]
pub struct AuthProviders {
    providers: HashMap<AuthProviderId, Arc<dyn AuthProvider>>,
}

impl AuthProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn AuthProvider>) -> Result<Self, AppError> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn AuthProvider>) -> Result<(), AppError> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            return Err(AppError::conflict(format!(
                "Auth provider already registered: {}",
                id.as_str()
            )));
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn get(&self, id: AuthProviderId) -> Result<&dyn AuthProvider, AppError> {
        self.providers
            .get(&id)
            .map(|provider| provider.as_ref())
            .ok_or_else(|| {
                AppError::bad_request(format!("Login dengan {} belum dikonfigurasi", id.as_str()))
            })
    }

    pub fn contains(&self, id: AuthProviderId) -> bool {
        self.providers.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr, sync::Arc};

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::{AuthProvider, AuthProviderId, AuthProviders, Credentials};
    use crate::{auth::Role, db::entities::user, error::AppError, test_helpers::user_model};

    struct StaticProvider(AuthProviderId);

    #[async_trait]
    impl AuthProvider for StaticProvider {
        fn id(&self) -> AuthProviderId {
            self.0
        }

        async fn authenticate(&self, _credentials: Credentials) -> Result<user::Model, AppError> {
            Ok(user_model(Uuid::new_v4(), "static@example.com", Role::Viewer))
        }
    }

    #[test]
    fn parses_provider_ids_case_insensitively() {
        assert_eq!(AuthProviderId::from_str("LOCAL"), Ok(AuthProviderId::Local));
        assert_eq!(AuthProviderId::from_str("google"), Ok(AuthProviderId::Google));
        assert!(AuthProviderId::from_str("github").is_err());
    }

    #[test]
    fn rejects_duplicate_registration() {
        let err = AuthProviders::new()
            .with_provider(Arc::new(StaticProvider(AuthProviderId::Local)))
            .expect("first registration should succeed")
            .with_provider(Arc::new(StaticProvider(AuthProviderId::Local)))
            .err()
            .expect("duplicate should fail");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn get_returns_registered_provider_only() {
        let providers = AuthProviders::new()
            .with_provider(Arc::new(StaticProvider(AuthProviderId::Local)))
            .expect("registration should succeed");

        let local = providers
            .get(AuthProviderId::Local)
            .expect("local provider should be present");
        let user = local
            .authenticate(Credentials::OAuthCode {
                code: "ignored".to_string(),
            })
            .await
            .expect("static provider authenticates");
        assert_eq!(user.email, "static@example.com");
        assert!(local.authorization_url("state").is_none());

        let err = providers
            .get(AuthProviderId::Google)
            .err()
            .expect("google is not registered");
        assert_eq!(err.message(), "Login dengan google belum dikonfigurasi");
        assert!(!providers.contains(AuthProviderId::Google));
    }
}
