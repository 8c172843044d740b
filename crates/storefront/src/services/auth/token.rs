//! Signed bearer tokens (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use apex_core::{Email, Role, UserId};

use super::AuthError;
use crate::models::{CurrentUser, User};

/// JWT claims carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, as a decimal string.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer signing with `secret`; tokens live for `ttl`.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl,
        }
    }

    /// Issue a token for `user`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        self.sign(&Claims {
            sub: user.id.to_string(),
            email: user.email.as_str().to_owned(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        })
    }

    /// Sign arbitrary claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }

    /// Verify a token's signature and expiry and return the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the token is malformed, forged or expired,
    /// and `AuthError::InvalidToken` if its claims do not describe a user.
    pub fn verify(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?.claims;

        let id = claims
            .sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken)?;
        let email = Email::parse(&claims.email).map_err(|_| AuthError::InvalidToken)?;

        Ok(CurrentUser {
            id,
            email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&SecretString::from(secret), Duration::hours(24))
    }

    fn user(role: Role) -> User {
        User {
            id: UserId::new(7),
            name: "Linh".to_owned(),
            email: Email::parse("linh@apex.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = issuer("k9$Qz!2mP#8vL@4xR&7nT^1wY*6bC%3d");
        let token = tokens.issue(&user(Role::Admin)).unwrap();

        let identity = tokens.verify(&token).unwrap();
        assert_eq!(identity.id, UserId::new(7));
        assert_eq!(identity.email.as_str(), "linh@apex.com");
        assert!(identity.is_admin());
    }

    #[test]
    fn test_rejects_other_secret() {
        let token = issuer("k9$Qz!2mP#8vL@4xR&7nT^1wY*6bC%3d")
            .issue(&user(Role::User))
            .unwrap();
        let err = issuer("a different signing key entirely!!")
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, AuthError::Token(_)));
    }

    #[test]
    fn test_rejects_expired() {
        let tokens = issuer("k9$Qz!2mP#8vL@4xR&7nT^1wY*6bC%3d");
        let past = Utc::now() - Duration::hours(2);
        let token = tokens
            .sign(&Claims {
                sub: "7".to_owned(),
                email: "linh@apex.com".to_owned(),
                role: Role::User,
                iat: past.timestamp(),
                exp: (past + Duration::hours(1)).timestamp(),
            })
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::Token(_))));
    }

    #[test]
    fn test_rejects_garbage_and_tampering() {
        let tokens = issuer("k9$Qz!2mP#8vL@4xR&7nT^1wY*6bC%3d");
        assert!(tokens.verify("not-a-token").is_err());

        let token = tokens.issue(&user(Role::User)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(tokens.verify(&tampered).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_subject() {
        let tokens = issuer("k9$Qz!2mP#8vL@4xR&7nT^1wY*6bC%3d");
        let now = Utc::now();
        let token = tokens
            .sign(&Claims {
                sub: "admin".to_owned(),
                email: "linh@apex.com".to_owned(),
                role: Role::Admin,
                iat: now.timestamp(),
                exp: (now + Duration::hours(1)).timestamp(),
            })
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }
}
