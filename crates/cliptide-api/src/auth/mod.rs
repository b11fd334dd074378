// Authentication module
//
// Config, JWT issuing/validation and the request extractor. Session
// endpoints (register, login, refresh, logout) live in api::users
// since they share the /users route group.

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{AuthConfig, JwtConfig};
pub use jwt::{hash_token, JwtService, TokenPair};
pub use middleware::{
    AuthState, AuthUser, FromRef, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, UNAUTHORIZED_MESSAGE,
};
