//! Stateless bearer tokens.
//!
//! Tokens are HS256-signed JWTs whose `sub` claim names the user. Nothing is
//! stored server-side; a token is valid until its `exp` passes.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ollachat_core::error::AuthError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the username the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    #[serde(default)]
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 30).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Lifetime of an access token.
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }
}

/// Issue an HS256 token for `subject` that expires after `ttl`.
pub fn issue_token(
    subject: &str,
    ttl: Duration,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: Some(subject.to_string()),
        exp: now + ttl.num_seconds(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Issue a token with the configured access lifetime.
pub fn issue_access_token(
    subject: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(subject, config.access_ttl(), config)
}

/// Verify a token and return its subject.
///
/// Expiry is checked with no leeway.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<String, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidSignature,
    })?;

    data.claims
        .sub
        .filter(|sub| !sub.is_empty())
        .ok_or(AuthError::MissingSubject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 30,
        }
    }

    fn encode_claims(claims: &Claims, config: &JwtConfig) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn issued_token_verifies_to_subject() {
        let config = test_config();
        let token = issue_access_token("alice", &config).expect("token generation should succeed");

        assert_eq!(verify_token(&token, &config), Ok("alice".to_string()));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let token = issue_token("alice", Duration::seconds(-5), &config).unwrap();

        assert_eq!(verify_token(&token, &config), Err(AuthError::Expired));
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let config = test_config();
        let other = JwtConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };
        let token = issue_access_token("alice", &other).unwrap();

        assert_eq!(
            verify_token(&token, &config),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_token_is_invalid_signature() {
        let config = test_config();
        let token = issue_access_token("alice", &config).unwrap();

        // Swap the payload for one naming a different user, keep the signature.
        let forged = issue_access_token("mallory", &config).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(
            verify_token(&tampered, &config),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn garbage_is_invalid_signature() {
        assert_eq!(
            verify_token("not-a-jwt", &test_config()),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn missing_subject_is_rejected() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: None,
            exp: now + 600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        assert_matches!(
            verify_token(&encode_claims(&claims, &config), &config),
            Err(AuthError::MissingSubject)
        );
    }

    #[test]
    fn empty_subject_is_rejected() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Some(String::new()),
            exp: now + 600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        assert_matches!(
            verify_token(&encode_claims(&claims, &config), &config),
            Err(AuthError::MissingSubject)
        );
    }
}
