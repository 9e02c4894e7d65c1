use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, TokenData, Validation};

use crate::entities::token::Claims;
use crate::errors::AuthError;
use crate::settings::{AppConfig, JwtKeys};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// Verifies bearer tokens minted by the site's auth provider with the
/// shared `jwt_secret`. Issuing is used by local tooling and tests.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
        }
    }

    pub fn create_jwt(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.keys.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// Signs a token for `subject` valid for `ttl`.
    pub fn issue_token(
        &self,
        subject: &str,
        email: &str,
        admin: bool,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            name: None,
            admin,
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };
        self.create_jwt(&claims)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.keys.decoding, &validation).map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(&AppConfig {
            jwt_secret: "s".repeat(48),
            ..AppConfig::default()
        })
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let jwt = service();
        let token = jwt.issue_token("owner-1", "owner@example.com", true, Duration::minutes(5)).unwrap();
        let claims = jwt.decode_jwt(&token).unwrap().claims;
        assert_eq!(claims.sub, "owner-1");
        assert!(claims.admin);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service();
        let token = jwt.issue_token("owner-1", "owner@example.com", true, Duration::hours(-2)).unwrap();
        assert!(matches!(jwt.decode_jwt(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let other = JwtService::new(&AppConfig {
            jwt_secret: "x".repeat(48),
            ..AppConfig::default()
        });
        let token = other.issue_token("a", "a@example.com", false, Duration::minutes(5)).unwrap();
        assert!(matches!(service().decode_jwt(&token), Err(AuthError::InvalidToken)));
    }
}
