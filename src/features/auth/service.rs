use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// Validates HS256-signed session tokens issued by the auth collaborator.
pub struct SessionValidator {
    decoding_key: DecodingKey,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct SessionClaims {
    sub: String,

    #[serde(rename = "iat", default)]
    _iat: Option<u64>,
    #[serde(rename = "exp", default)]
    _exp: Option<u64>,

    #[serde(default)]
    email: Option<String>,

    /// Google OAuth access token carried in the session, as the auth
    /// collaborator stores it after the consent flow.
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

impl SessionValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    #[cfg(test)]
    fn with_secret(secret: &str, leeway_secs: u64) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway: leeway_secs,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        Ok(AuthenticatedUser {
            sub: claims.sub,
            email: claims.email,
            access_token: claims.access_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
        access_token: Option<String>,
    }

    fn sign(claims: &TestClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> u64 {
        (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as u64
    }

    #[test]
    fn test_valid_token_yields_user_with_drive_credentials() {
        let validator = SessionValidator::with_secret("secret", 60);
        let token = sign(
            &TestClaims {
                sub: "user-1".to_string(),
                exp: future_exp(),
                email: Some("owner@example.com".to_string()),
                access_token: Some("ya29.token".to_string()),
            },
            "secret",
        );

        let user = validator.validate_token(&token).unwrap();
        assert_eq!(user.sub, "user-1");
        assert_eq!(user.email.as_deref(), Some("owner@example.com"));
        assert_eq!(user.drive_token(), Some("ya29.token"));
    }

    #[test]
    fn test_token_without_access_token_still_validates() {
        let validator = SessionValidator::with_secret("secret", 60);
        let token = sign(
            &TestClaims {
                sub: "user-1".to_string(),
                exp: future_exp(),
                email: None,
                access_token: None,
            },
            "secret",
        );

        let user = validator.validate_token(&token).unwrap();
        assert!(user.drive_token().is_none());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let validator = SessionValidator::with_secret("secret", 60);
        let token = sign(
            &TestClaims {
                sub: "user-1".to_string(),
                exp: future_exp(),
                email: None,
                access_token: None,
            },
            "other-secret",
        );

        assert!(matches!(
            validator.validate_token(&token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let validator = SessionValidator::with_secret("secret", 0);
        let token = sign(
            &TestClaims {
                sub: "user-1".to_string(),
                exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp() as u64,
                email: None,
                access_token: None,
            },
            "secret",
        );

        assert!(validator.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let validator = SessionValidator::with_secret("secret", 60);
        assert!(validator.validate_token("not-a-jwt").is_err());
    }
}
