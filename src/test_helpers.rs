//! Fixtures shared by unit tests and the `tests/` integration suites.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, FixedOffset, TimeZone};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    auth::{
        OtpPurpose, Role,
        bootstrap::build_providers,
        jwt::{JwtKeys, encode_token, make_access_claims},
    },
    config::{AppConfig, AuthConfig, StorageConfig},
    db::entities::{
        announcement, bookmark, category, comment, history, image, masjid, otp_verification, post,
        session, user,
    },
    mail::Mailer,
    routes::build_app,
    state::AppState,
    storage::LocalObjectStorage,
};

pub const TEST_JWT_SECRET: &str = "unit-test-secret-value";

pub fn ts() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .and_then(|offset| offset.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single())
        .unwrap_or_default()
}

/// Verified local account with a placeholder hash.
pub fn user_model(id: Uuid, email: &str, role: Role) -> user::Model {
    user::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        email: email.to_string(),
        password_hash: Some("hash".to_string()),
        fullname: "Hamba Allah".to_string(),
        role: role.as_str().to_string(),
        is_verified: true,
        has_google_account: false,
        avatar_url: None,
    }
}

pub fn otp_model(
    user_id: Uuid,
    code: &str,
    purpose: OtpPurpose,
    expires_at: DateTime<FixedOffset>,
    is_used: bool,
) -> otp_verification::Model {
    otp_verification::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        user_id,
        code: code.to_string(),
        purpose: purpose.as_str().to_string(),
        expires_at,
        is_used,
        attempts: 0,
    }
}

pub fn session_model(user_id: Uuid, token: &str, expires: DateTime<FixedOffset>) -> session::Model {
    session::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        user_id,
        session_token: token.to_string(),
        expires,
    }
}

/// Published post titled after its slug.
pub fn post_model(author_id: Uuid, slug: &str, post_type: &str) -> post::Model {
    post::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        slug: slug.to_string(),
        title: slug.replace('-', " "),
        content: "<p>Isi</p>".to_string(),
        excerpt: None,
        post_type: post_type.to_string(),
        author_id,
        thumbnail_url: None,
        published_at: Some(ts()),
    }
}

pub fn masjid_model(post_id: Uuid, location: &str) -> masjid::Model {
    masjid::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        post_id,
        location: location.to_string(),
        architect: Some("Friedrich Silaban".to_string()),
        year_built: Some(1978),
        style: None,
        map_url: None,
        capacity: Some(120_000),
    }
}

pub fn comment_model(post_id: Uuid, user_id: Uuid, content: &str) -> comment::Model {
    comment::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        post_id,
        user_id,
        content: content.to_string(),
    }
}

pub fn history_model(user_id: Uuid, post_id: Uuid, viewed_at: DateTime<FixedOffset>) -> history::Model {
    history::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        user_id,
        post_id,
        viewed_at,
    }
}

pub fn bookmark_model(user_id: Uuid, post_id: Uuid) -> bookmark::Model {
    bookmark::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        user_id,
        post_id,
    }
}

pub fn category_model(name: &str, slug: &str) -> category::Model {
    category::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
    }
}

pub fn image_model(post_id: Uuid, key: &str) -> image::Model {
    image::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        post_id,
        url: format!("/uploads/{key}"),
        storage_key: key.to_string(),
        content_type: "image/png".to_string(),
        caption: None,
    }
}

pub fn announcement_model(author_id: Uuid, title: &str, is_active: bool) -> announcement::Model {
    announcement::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        title: title.to_string(),
        content: "Pengumuman".to_string(),
        is_active,
        author_id,
    }
}

pub fn test_auth_config() -> AuthConfig {
    let mut cfg = AuthConfig::new(TEST_JWT_SECRET);
    cfg.admin_email = "admin@masjid.id".to_string();
    cfg.admin_password = "adminpassword".to_string();
    cfg
}

/// State over `db` with a throwaway upload directory.
pub fn test_state(db: DatabaseConnection, mailer: Arc<dyn Mailer>) -> Arc<AppState> {
    let auth = test_auth_config();
    let config = AppConfig {
        auth: Some(auth.clone()),
        storage: StorageConfig {
            upload_dir: std::env::temp_dir()
                .join(format!("masjid-info-test-{}", Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
            ..StorageConfig::default()
        },
        ..AppConfig::default()
    };
    let providers = build_providers(&config, &db).unwrap_or_default();
    let storage = Arc::new(LocalObjectStorage::new(&config.storage));
    AppState::new(config, auth, db, providers, mailer, storage)
}

pub fn test_router(db: DatabaseConnection, mailer: Arc<dyn Mailer>) -> Router {
    build_app(test_state(db, mailer))
}

/// Signed access token for `role`, as login would issue it.
pub fn bearer_for(user_id: Uuid, role: Role) -> String {
    let claims = make_access_claims(&user_id, "tester@masjid.id", role, 900);
    let token = encode_token(&JwtKeys::from_secret(TEST_JWT_SECRET.as_bytes()), &claims)
        .unwrap_or_default();
    format!("Bearer {token}")
}
