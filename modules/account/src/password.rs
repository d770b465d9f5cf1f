//! Password hashes and session tokens.
//!
//! Passwords are stored as `pbkdf2-sha256$<iterations>$<salt>$<hash>`, salt and hash hex
//! encoded. Session tokens are random and only their SHA-256 digest gets stored.

use ring::{
    digest, pbkdf2,
    rand::{SecureRandom, SystemRandom},
};
use sha2::{Digest, Sha256};
use std::num::NonZeroU32;

const SCHEME: &str = "pbkdf2-sha256";
const ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const ITERATIONS: NonZeroU32 = NonZeroU32::MIN.saturating_add(99_999);
const SALT_LEN: usize = 16;
const TOKEN_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to gather randomness")]
    Random,
}

fn random<const N: usize>(rng: &SystemRandom) -> Result<[u8; N], PasswordError> {
    let mut buf = [0u8; N];
    rng.fill(&mut buf).map_err(|_| PasswordError::Random)?;
    Ok(buf)
}

/// Hash a password with a fresh salt.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = random::<SALT_LEN>(&SystemRandom::new())?;

    let mut hash = [0u8; digest::SHA256_OUTPUT_LEN];
    pbkdf2::derive(ALGORITHM, ITERATIONS, &salt, password.as_bytes(), &mut hash);

    Ok(format!(
        "{SCHEME}${ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    ))
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let Ok(iterations) = iterations.parse::<NonZeroU32>() else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (hex::decode(salt), hex::decode(hash)) else {
        return false;
    };

    pbkdf2::verify(ALGORITHM, iterations, &salt, password.as_bytes(), &hash).is_ok()
}

/// Create a new session token, as handed out in the session cookie.
pub fn new_token() -> Result<String, PasswordError> {
    Ok(hex::encode(random::<TOKEN_LEN>(&SystemRandom::new())?))
}

/// The id a session is stored under.
pub fn session_id(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn verify_hashed() -> anyhow::Result<()> {
        let encoded = hash("admin123")?;
        assert!(encoded.starts_with("pbkdf2-sha256$100000$"));
        assert!(verify("admin123", &encoded));
        assert!(!verify("admin124", &encoded));
        Ok(())
    }

    #[test]
    fn salted() -> anyhow::Result<()> {
        assert_ne!(hash("aset123")?, hash("aset123")?);
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("admin123")]
    #[case("bcrypt$10$abc$def")]
    #[case("pbkdf2-sha256$0$00$00")]
    #[case("pbkdf2-sha256$1000$zz$00")]
    #[case("pbkdf2-sha256$1000$00$00$00")]
    fn malformed(#[case] encoded: &str) {
        assert!(!verify("admin123", encoded));
    }

    #[test]
    fn tokens() -> anyhow::Result<()> {
        let token = new_token()?;
        assert_eq!(token.len(), TOKEN_LEN * 2);
        assert_ne!(token, new_token()?);

        let id = session_id(&token);
        assert_eq!(id.len(), 64);
        assert_eq!(id, session_id(&token));
        assert_ne!(id, token);
        Ok(())
    }
}
