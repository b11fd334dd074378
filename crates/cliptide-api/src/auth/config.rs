// Auth settings, read from AUTH_* environment variables
// Decision: Missing secret falls back to an ephemeral random one so dev
//           mode works out of the box; sessions then die with the process

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing key for both token kinds
    pub secret: String,
    pub access_token_lifetime: Duration,
    pub refresh_token_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_lifetime: Duration::from_secs(24 * 60 * 60), // 1 day
            refresh_token_lifetime: Duration::from_secs(10 * 24 * 60 * 60), // 10 days
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "AUTH_JWT_SECRET not set, generated an ephemeral secret; sessions will not survive restarts"
            );
            use rand::Rng;
            let bytes: [u8; 32] = rand::thread_rng().gen();
            hex::encode(bytes)
        });

        let defaults = JwtConfig::default();

        let access_token_lifetime = std::env::var("AUTH_JWT_ACCESS_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.access_token_lifetime);

        let refresh_token_lifetime = std::env::var("AUTH_JWT_REFRESH_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.refresh_token_lifetime);

        Self {
            jwt: JwtConfig {
                secret,
                access_token_lifetime,
                refresh_token_lifetime,
            },
        }
    }
}
