use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{Role, password::hash_password, providers::local::normalize_email},
    config::{AppConfig, AuthConfig},
    db::dao::{DaoBase, NewUser, OtpDao, UserDao},
    error::AppError,
};

use super::providers::{AuthProviders, GoogleAuthProvider, HttpGoogleClient, LocalAuthProvider};

/// Local login is always available; Google only with a `google` section.
pub fn build_providers(cfg: &AppConfig, db: &DatabaseConnection) -> Result<AuthProviders, AppError> {
    let users = UserDao::new(db);
    let mut providers =
        AuthProviders::new().with_provider(Arc::new(LocalAuthProvider::new(users.clone())))?;
    if let Some(google) = cfg.google.as_ref() {
        let client = Arc::new(HttpGoogleClient::new(google.clone()));
        providers.add(Arc::new(GoogleAuthProvider::new(
            client,
            users,
            OtpDao::new(db),
        )))?;
    }
    Ok(providers)
}

pub async fn init_providers(cfg: &AppConfig, db: &DatabaseConnection) -> anyhow::Result<AuthProviders> {
    let providers = build_providers(cfg, db)?;
    if let Some(auth) = cfg.auth.as_ref() {
        seed_super_admin(auth, &UserDao::new(db)).await?;
    }
    Ok(providers)
}

/// Creates the configured super admin unless that email already exists.
pub async fn seed_super_admin(cfg: &AuthConfig, users: &UserDao) -> anyhow::Result<()> {
    let email = normalize_email(&cfg.admin_email);
    if email.is_empty() {
        tracing::warn!("auth.admin_email not set; skipping super admin seed");
        return Ok(());
    }

    if let Some(existing) = users.find_by_email(&email).await? {
        tracing::info!(user_id = %existing.id, role = %existing.role, "super admin seed skipped, email present");
        return Ok(());
    }

    let hash = hash_password(&cfg.admin_password)
        .map_err(|err| anyhow::anyhow!("admin seed hash error: {err}"))?;
    let user = users
        .create_user(NewUser {
            email,
            fullname: cfg.admin_fullname.clone(),
            password_hash: Some(hash),
            role: Role::SuperAdmin,
            is_verified: true,
            has_google_account: false,
        })
        .await?;
    tracing::info!(user_id = %user.id, "seeded super admin");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{build_providers, seed_super_admin};
    use crate::{
        auth::{Role, providers::AuthProviderId},
        config::{AppConfig, AuthConfig, GoogleConfig},
        db::dao::{DaoBase, UserDao},
        db::entities::user,
        test_helpers::user_model,
    };

    fn admin_cfg() -> AuthConfig {
        let mut cfg = AuthConfig::new("unit-test-secret-value");
        cfg.admin_email = "Admin@Masjid.id".to_string();
        cfg.admin_password = "adminpassword".to_string();
        cfg
    }

    #[test]
    fn google_provider_requires_config() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut cfg = AppConfig::default();

        let providers = build_providers(&cfg, &db).expect("providers should build");
        assert!(providers.contains(AuthProviderId::Local));
        assert!(!providers.contains(AuthProviderId::Google));

        cfg.google = Some(GoogleConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "http://localhost/cb".to_string(),
        });
        let providers = build_providers(&cfg, &db).expect("providers should build");
        assert!(providers.contains(AuthProviderId::Google));
    }

    #[tokio::test]
    async fn seeds_super_admin_when_missing() {
        let created = user_model(Uuid::new_v4(), "admin@masjid.id", Role::SuperAdmin);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[created]])
            .into_connection();

        seed_super_admin(&admin_cfg(), &UserDao::new(&db))
            .await
            .expect("seed should succeed");
    }

    #[tokio::test]
    async fn leaves_existing_admin_alone() {
        let existing = user_model(Uuid::new_v4(), "admin@masjid.id", Role::SuperAdmin);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        seed_super_admin(&admin_cfg(), &UserDao::new(&db))
            .await
            .expect("seed should be a no-op");
    }

    #[tokio::test]
    async fn rejects_short_admin_password() {
        let mut cfg = admin_cfg();
        cfg.admin_password = "short".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = seed_super_admin(&cfg, &UserDao::new(&db))
            .await
            .expect_err("short password should fail");
        assert!(err.to_string().contains("admin seed hash error"));
    }
}
