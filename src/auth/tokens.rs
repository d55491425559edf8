use rand::{Rng, RngCore, rngs::OsRng};

pub const OTP_LENGTH: usize = 6;
pub const OPAQUE_TOKEN_BYTES: usize = 40;

/// Six decimal digits, zero padded.
pub fn generate_otp() -> String {
    let code: u32 = OsRng.gen_range(0..1_000_000);
    format!("{code:0width$}", width = OTP_LENGTH)
}

/// 40 random bytes as lowercase hex; used for reset links and session cookies.
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; OPAQUE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
