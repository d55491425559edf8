use anyhow::{Result, bail};
use lettre::message::Mailbox;

use super::AppConfig;

const MIN_JWT_SECRET_LEN: usize = 16;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.general.client_url.trim().is_empty() {
        errors.push("general.client_url must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.jwt_secret.trim().len() < MIN_JWT_SECRET_LEN {
            errors.push(format!(
                "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} characters"
            ));
        }

        if auth.admin_email.trim().is_empty() {
            errors.push("auth.admin_email must not be empty".to_string());
        }

        if auth.admin_password.len() < 8 {
            errors.push("auth.admin_password must be at least 8 characters".to_string());
        }

        if auth.access_token_ttl_secs == 0 {
            errors.push("auth.access_token_ttl_secs must be > 0".to_string());
        }

        if auth.session_ttl_days <= 0 {
            errors.push("auth.session_ttl_days must be > 0".to_string());
        }

        if auth.otp_ttl_minutes <= 0 {
            errors.push("auth.otp_ttl_minutes must be > 0".to_string());
        }

        if auth.otp_max_attempts <= 0 {
            errors.push("auth.otp_max_attempts must be > 0".to_string());
        }

        if auth.reset_token_ttl_minutes <= 0 {
            errors.push("auth.reset_token_ttl_minutes must be > 0".to_string());
        }
    }

    if let Some(mail) = cfg.mail.as_ref() {
        if mail.smtp_host.trim().is_empty() {
            errors.push("mail.smtp_host must not be empty".to_string());
        }

        if mail.from_address.parse::<Mailbox>().is_err() {
            errors.push(format!(
                "mail.from_address ({}) is not a valid mailbox",
                mail.from_address
            ));
        }
    }

    if let Some(google) = cfg.google.as_ref() {
        if google.client_id.trim().is_empty() || google.client_secret.trim().is_empty() {
            errors.push("google.client_id and google.client_secret are required".to_string());
        }

        if google.redirect_url.trim().is_empty() {
            errors.push("google.redirect_url must not be empty".to_string());
        }
    }

    if cfg.storage.upload_dir.trim().is_empty() {
        errors.push("storage.upload_dir must not be empty".to_string());
    }

    if cfg.storage.max_upload_bytes == 0 {
        errors.push("storage.max_upload_bytes must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
