pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";
pub const DEFAULT_ENABLE_DOCS_IN_RELEASE: bool = false;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;

pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
pub const DEFAULT_OTP_TTL_MINUTES: i64 = 10;
pub const DEFAULT_OTP_MAX_ATTEMPTS: i64 = 5;
pub const DEFAULT_RESET_TOKEN_TTL_MINUTES: i64 = 60;
pub const DEFAULT_ADMIN_FULLNAME: &str = "Super Admin";

pub const DEFAULT_SMTP_PORT: i64 = 587;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "/uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: i64 = 5 * 1024 * 1024;
