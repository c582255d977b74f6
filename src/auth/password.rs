use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{error, warn};

// Argon2id, m=19456 KiB, t=2, p=1. Every stored hash and the decoy use these.
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

lazy_static! {
    static ref DECOY_HASH: Option<String> = hash_password("decoy-password-for-unknown-users").ok();
}

/// Hash with a fresh random salt; the PHC string embeds algorithm, params and salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// `false` for a wrong password and for anything that is not a parseable hash.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    hasher().verify_password(plain.as_bytes(), &parsed).is_ok()
}

/// Compute the decoy up front so the first unknown-user login is not the slow one.
pub fn prepare_decoy() {
    lazy_static::initialize(&DECOY_HASH);
}

/// Spend the same effort as a real verification and throw the answer away.
/// Keeps unknown-username logins from returning measurably faster.
pub fn dummy_verify(plain: &str) {
    if let Some(decoy) = DECOY_HASH.as_deref() {
        let _ = verify_password(plain, decoy);
    }
}
