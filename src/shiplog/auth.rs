//! Credential hashing and stateless session tokens.
//!
//! Passwords are hashed with Argon2id into PHC-format strings, so each
//! digest carries its own salt and work factor. Session tokens are HS256
//! JWTs signed with a process-wide secret loaded once at startup; there is
//! no server-side revocation, a token stays valid until it expires.

use crate::shiplog::models::Identity;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days a session token stays valid after being issued.
const TOKEN_TTL_DAYS: i64 = 30;

/// Hash a password with a fresh random salt. Returns a PHC-format string.
///
/// # Errors
/// Returns an error if the underlying hash computation fails.
pub fn hash_password(plaintext: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plaintext.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC-format digest.
///
/// This is a pure predicate: an empty, malformed or mismatched digest yields
/// `false`, never an error.
#[must_use]
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: Uuid,
    username: String,
    exp: i64,
}

/// Issues and verifies signed session tokens for a single process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Sign a token carrying the identity and an expiry claim.
    ///
    /// # Errors
    /// Returns an error if claim serialization or signing fails.
    pub fn issue(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id: identity.id,
            username: identity.username.clone(),
            exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token's signature and expiry and recover the identity.
    ///
    /// # Errors
    /// Returns an error for a malformed, tampered or expired token.
    pub fn verify(&self, token: &str) -> Result<Identity, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;

        Ok(Identity {
            id: data.claims.id,
            username: data.claims.username,
        })
    }
}
