use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;
use crate::common::UserId;

/// Claims this service relies on; `sub` is the acting user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: UserId,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// Verifies bearer tokens from the identity provider
///
/// Minting exists for `buddyctl issue-token`; both sides only have to agree
/// on the shared secret and issuer.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    pub fn issue(&self, user_id: UserId, ttl: Duration) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Resolve a token to the user it speaks for
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(issuer: &str) -> JwtService {
        JwtService::new("test_secret_key", issuer.to_string())
    }

    #[test]
    fn test_issued_token_resolves_to_user() {
        let jwt = service("buddy-match");
        let user_id = UserId::new();

        let token = jwt.issue(user_id, Duration::hours(24)).unwrap();

        assert_eq!(jwt.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret() {
        let token = service("buddy-match")
            .issue(UserId::new(), Duration::hours(1))
            .unwrap();
        let other = JwtService::new("another_secret", "buddy-match".to_string());

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_issuer() {
        let token = service("someone-else")
            .issue(UserId::new(), Duration::hours(1))
            .unwrap();

        assert!(matches!(
            service("buddy-match").verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let jwt = service("buddy-match");
        // Past the default 60s leeway
        let token = jwt.issue(UserId::new(), Duration::hours(-2)).unwrap();

        assert!(matches!(jwt.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_subject_must_be_a_user_id() {
        #[derive(Serialize)]
        struct Foreign<'a> {
            sub: &'a str,
            exp: i64,
            iss: &'a str,
        }
        let claims = Foreign {
            sub: "service-account",
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iss: "buddy-match",
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key"),
        )
        .unwrap();

        assert!(matches!(
            service("buddy-match").verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
