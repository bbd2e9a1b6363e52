use sha2::{Digest, Sha256};
use uuid::Uuid;

const SCHEME: &str = "sha256";

/// Hash a password with a fresh random salt: `sha256$<salt>$<hex digest>`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}${}", SCHEME, salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(salt), Some(expected)) => digest(salt, password) == expected,
        _ => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("s3cret");
        assert!(stored.starts_with("sha256$"));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("S3cret", &stored));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_rejects_malformed_hash() {
        assert!(!verify_password("admin", "admin"));
        assert!(!verify_password("admin", "md5$x$y"));
    }
}
