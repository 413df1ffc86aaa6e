use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT claims for web session tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: i64,    // expiry (unix timestamp)
    pub iat: i64,    // issued at
}

/// Create a JWT session token for a user.
pub fn create_session_token(
    user_id: &str,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate a JWT session token and return the claims.
pub fn validate_session_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Hash a password with argon2 for storage.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let secret = "test-secret";
        let token = create_session_token("user123", secret, 1).unwrap();
        let claims = validate_session_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "user123");
    }

    #[test]
    fn test_jwt_invalid_secret() {
        let token = create_session_token("user123", "secret1", 1).unwrap();
        assert!(validate_session_token(&token, "secret2").is_err());
    }

    #[test]
    fn test_jwt_expiry_is_in_future() {
        let secret = "test";
        let token = create_session_token("u1", secret, 1).unwrap();
        let claims = validate_session_token(&token, secret).unwrap();
        let now = Utc::now().timestamp();
        // exp should be roughly 1 hour from now (within 10s tolerance)
        assert!(claims.exp > now);
        assert!(claims.exp <= now + 3610);
    }

    #[test]
    fn test_jwt_validate_with_garbage_fails() {
        assert!(validate_session_token("", "secret").is_err());
        assert!(validate_session_token("not-a-jwt-token", "secret").is_err());
    }

    #[test]
    fn test_jwt_validate_with_tampered_token_fails() {
        let token = create_session_token("u1", "secret", 1).unwrap();
        // Flip a character in the middle of the token
        let mut chars: Vec<char> = token.chars().collect();
        let mid = chars.len() / 2;
        chars[mid] = if chars[mid] == 'a' { 'b' } else { 'a' };
        let tampered: String = chars.into_iter().collect();
        assert!(validate_session_token(&tampered, "secret").is_err());
    }

    #[test]
    fn test_password_hash_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_password_hash_is_argon2_format() {
        let hash = hash_password("some password").unwrap();
        assert!(
            hash.starts_with("$argon2"),
            "hash should start with $argon2, got: {}",
            &hash[..10]
        );
    }

    #[test]
    fn test_same_password_different_hashes() {
        // Each hash uses a different salt, so same input -> different hashes
        let h1 = hash_password("password123").unwrap();
        let h2 = hash_password("password123").unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password("password123", &h1));
        assert!(verify_password("password123", &h2));
    }

    #[test]
    fn test_verify_with_invalid_hash_returns_false() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
        assert!(!verify_password("anything", ""));
    }
}
