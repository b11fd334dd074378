// Cliptide Domain Entities
//
// This crate defines the DB-agnostic entity types for the video
// platform: users and their channels, videos, comments, tweets, likes,
// playlists and subscriptions, plus the aggregated read models the API
// serves (channel profiles, dashboards, paginated feeds).
//
// Key design decisions:
// - Entities carry no storage or framework concerns; rows map into them
//   at the storage boundary
// - Wire format is camelCase JSON (serde rename), Rust fields stay
//   snake_case
// - Secret material (password hashes, refresh token digests) has no
//   representation here at all
// - OpenAPI schema derives are feature-gated so non-API consumers skip
//   the utoipa dependency

pub mod comment;
pub mod page;
pub mod playlist;
pub mod stats;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::{Comment, CommentWithOwner};
pub use page::Page;
pub use playlist::{Playlist, PlaylistWithVideos};
pub use stats::{ChannelStats, LikedVideoIds};
pub use subscription::{ChannelSubscriber, SubscribedChannel};
pub use tweet::Tweet;
pub use user::{ChannelProfile, User, UserSummary};
pub use video::{Video, VideoSummary, VideoWithOwner};
