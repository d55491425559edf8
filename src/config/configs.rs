use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: Option<DatabaseConfig>,
    pub auth: Option<AuthConfig>,
    pub mail: Option<MailConfig>,
    pub google: Option<GoogleConfig>,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
    /// Frontend origin used in reset links and OAuth redirects.
    pub client_url: String,
    pub enable_docs_in_release: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
            client_url: defaults::DEFAULT_CLIENT_URL.to_string(),
            enable_docs_in_release: defaults::DEFAULT_ENABLE_DOCS_IN_RELEASE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_db_min_idle")]
    pub min_idle: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
    #[serde(default = "default_otp_ttl_minutes")]
    pub otp_ttl_minutes: i64,
    #[serde(default = "default_otp_max_attempts")]
    pub otp_max_attempts: i32,
    #[serde(default = "default_reset_token_ttl_minutes")]
    pub reset_token_ttl_minutes: i64,
    /// Marks auth cookies `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub cookie_secure: bool,
    pub admin_email: String,
    pub admin_password: String,
    #[serde(default = "default_admin_fullname")]
    pub admin_fullname: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_ttl_secs: default_access_token_ttl_secs(),
            session_ttl_days: default_session_ttl_days(),
            otp_ttl_minutes: default_otp_ttl_minutes(),
            otp_max_attempts: default_otp_max_attempts(),
            reset_token_ttl_minutes: default_reset_token_ttl_minutes(),
            cookie_secure: false,
            admin_email: String::new(),
            admin_password: String::new(),
            admin_fullname: default_admin_fullname(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: defaults::DEFAULT_UPLOAD_DIR.to_string(),
            public_base_url: defaults::DEFAULT_PUBLIC_BASE_URL.to_string(),
            max_upload_bytes: defaults::DEFAULT_MAX_UPLOAD_BYTES as usize,
        }
    }
}

fn default_db_max_connections() -> u32 {
    defaults::DEFAULT_DB_MAX_CONNECTIONS as u32
}

fn default_db_min_idle() -> u32 {
    defaults::DEFAULT_DB_MIN_IDLE as u32
}

fn default_access_token_ttl_secs() -> u64 {
    defaults::DEFAULT_ACCESS_TOKEN_TTL_SECS as u64
}

fn default_session_ttl_days() -> i64 {
    defaults::DEFAULT_SESSION_TTL_DAYS
}

fn default_otp_ttl_minutes() -> i64 {
    defaults::DEFAULT_OTP_TTL_MINUTES
}

fn default_otp_max_attempts() -> i32 {
    defaults::DEFAULT_OTP_MAX_ATTEMPTS as i32
}

fn default_reset_token_ttl_minutes() -> i64 {
    defaults::DEFAULT_RESET_TOKEN_TTL_MINUTES
}

fn default_admin_fullname() -> String {
    defaults::DEFAULT_ADMIN_FULLNAME.to_string()
}

fn default_smtp_port() -> u16 {
    defaults::DEFAULT_SMTP_PORT as u16
}
