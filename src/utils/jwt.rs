use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// 令牌签发由外部身份系统负责；这里只做校验，generate 留给运维脚本/测试使用
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // customer_id
    #[serde(default)]
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
        }
    }

    pub fn generate_access_token(&self, customer_id: i64, is_admin: bool) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expires_in);

        let claims = Claims {
            sub: customer_id.to_string(),
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let service = JwtService::new("test-secret", 3600);
        let token = service.generate_access_token(42, false).unwrap();
        let claims = service.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_admin_flag_survives_round_trip() {
        let service = JwtService::new("test-secret", 3600);
        let token = service.generate_access_token(1, true).unwrap();
        let claims = service.verify_access_token(&token).unwrap();
        assert!(claims.is_admin);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtService::new("secret-a", 3600);
        let verifier = JwtService::new("secret-b", 3600);
        let token = issuer.generate_access_token(1, false).unwrap();
        assert!(verifier.verify_access_token(&token).is_err());
    }
}
