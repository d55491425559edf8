use bcrypt::{hash, verify};

use crate::error::AppError;

pub const BCRYPT_COST: u32 = 10;
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "Password minimal {MIN_PASSWORD_LEN} karakter"
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    validate_password(password)?;
    hash(password, BCRYPT_COST)
        .map_err(|err| AppError::internal_with_source("Gagal memproses password", err))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match verify(password, password_hash) {
        Ok(valid) => valid,
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash could not be parsed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hashes_with_cost_ten_and_verifies() {
        let hash = hash_password("bismillah123").expect("hash should succeed");
        assert!(hash.starts_with("$2b$10$"), "unexpected hash: {hash}");
        assert!(verify_password("bismillah123", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn rejects_short_passwords() {
        let err = hash_password("pendek").expect_err("short password should fail");
        assert_eq!(err.message(), "Password minimal 8 karakter");
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("whatever1", "not-a-bcrypt-hash"));
    }
}
