// Services layer for business logic
// Services own the ownership guards and error mapping, calling storage
// and media directly

pub mod comment;
pub mod dashboard;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::CommentService;
pub use dashboard::DashboardService;
pub use like::LikeService;
pub use playlist::PlaylistService;
pub use subscription::SubscriptionService;
pub use tweet::TweetService;
pub use user::UserService;
pub use video::VideoService;

use crate::api::common::{ApiError, ApiResult};
use uuid::Uuid;

/// Ownership guard for mutations. Runs strictly after the NotFound
/// fetch and strictly before any write.
pub(crate) fn ensure_owner(owner_id: Uuid, requester_id: Uuid, message: &str) -> ApiResult<()> {
    if owner_id == requester_id {
        Ok(())
    } else {
        Err(ApiError::forbidden(message))
    }
}
