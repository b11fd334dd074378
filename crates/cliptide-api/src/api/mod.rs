// HTTP route handlers, one submodule per resource
//
// Submodules own their request/response types and an AppState holding
// the service they drive; main.rs merges them into one router.

pub mod comments;
pub mod common;
pub mod dashboard;
pub mod healthcheck;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod validation;
pub mod videos;

pub use common::{ApiError, ApiResponse, ApiResult, ErrorResponse};
