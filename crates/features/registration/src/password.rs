//! Password policy and storage format.
//!
//! Stored hashes read `salt$hex(sha256(salt:password))`.

use chub_domain::config::PasswordPolicy;
use chub_kernel::safe_nanoid;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// True when `password` satisfies every requirement of `policy`.
#[must_use]
pub fn meets_policy(policy: &PasswordPolicy, password: &str) -> bool {
    password.chars().count() >= policy.min_length
        && (!policy.require_uppercase || password.chars().any(char::is_uppercase))
        && (!policy.require_digit || password.chars().any(|c| c.is_ascii_digit()))
}

#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt = safe_nanoid!(SALT_LEN);
    let digest = digest(&salt, password);
    format!("{salt}${digest}")
}

/// Checks `password` against a hash produced by [`hash_password`].
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    stored.split_once('$').is_some_and(|(salt, expected)| digest(salt, password) == expected)
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
