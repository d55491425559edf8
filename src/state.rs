use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{jwt::JwtKeys, providers::AuthProviders},
    config::{AppConfig, AuthConfig},
    mail::Mailer,
    storage::ObjectStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Copy of `config.auth`, which must be present to serve.
    pub auth: AuthConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    pub auth_providers: AuthProviders,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        auth: AuthConfig,
        db: DatabaseConnection,
        auth_providers: AuthProviders,
        mailer: Arc<dyn Mailer>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Arc<Self> {
        let jwt = JwtKeys::from_secret(auth.jwt_secret.as_bytes());
        Arc::new(Self {
            config,
            auth,
            db,
            jwt,
            auth_providers,
            mailer,
            storage,
        })
    }
}
