// Token minting and validation
// Decision: HS256 with a single shared secret, no key rotation
// Decision: Refresh tokens carry a random jti so every rotation yields
//           a distinct token even within the same second

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::JwtConfig;

/// 32 hex characters of CSPRNG output
fn generate_random_id() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 16] = rng.gen();
    hex::encode(bytes)
}

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    /// User id
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Email at issue time
    pub email: String,
    /// Full name at issue time
    pub fullname: String,
    /// "access", rejected everywhere a refresh token is expected
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Claims carried by a refresh token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshTokenClaims {
    /// User id
    pub sub: String,
    /// "refresh"
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    /// Random per-issue id, makes concurrent tokens distinct
    pub jti: String,
}

/// Token pair issued on login and rotation
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints and validates both token kinds with one symmetric key
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Mint a short-lived access token carrying the user's identity
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
        fullname: &str,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::from_std(self.config.access_token_lifetime)?;

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            fullname: fullname.to_string(),
            token_type: "access".to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("failed to encode access token")
    }

    /// Mint a long-lived refresh token, identity-free apart from the user id
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::from_std(self.config.refresh_token_lifetime)?;

        let claims = RefreshTokenClaims {
            sub: user_id.to_string(),
            token_type: "refresh".to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: generate_random_id(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .context("failed to encode refresh token")
    }

    /// Mint the pair handed out on login and on every rotation
    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
        fullname: &str,
    ) -> Result<TokenPair> {
        let access_token = self.generate_access_token(user_id, username, email, fullname)?;
        let refresh_token = self.generate_refresh_token(user_id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Decode an access token, rejecting expired and mistyped tokens
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .context("invalid access token")?;

        if token_data.claims.token_type != "access" {
            anyhow::bail!("invalid token type");
        }

        Ok(token_data.claims)
    }

    /// Decode a refresh token, rejecting expired and mistyped tokens
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<RefreshTokenClaims>(token, &self.decoding_key, &validation)
            .context("invalid refresh token")?;

        if token_data.claims.token_type != "refresh" {
            anyhow::bail!("invalid token type");
        }

        Ok(token_data.claims)
    }

    pub fn access_token_lifetime_secs(&self) -> i64 {
        self.config.access_token_lifetime.as_secs() as i64
    }

    pub fn refresh_token_lifetime_secs(&self) -> i64 {
        self.config.refresh_token_lifetime.as_secs() as i64
    }
}

/// SHA-256 of the token, hex encoded. Stored refresh tokens only ever
/// appear in this form.
pub fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(token.as_bytes());
    hex::encode(hash)
}
