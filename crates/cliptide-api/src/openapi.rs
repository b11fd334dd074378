// OpenAPI document for the Cliptide API
//
// Shared between the server (which mounts Swagger UI on it) and the
// export-openapi binary (which dumps it as static JSON).

use crate::api;
use crate::api::common::{ApiResponse, ErrorResponse};
use cliptide_core::{
    ChannelProfile, ChannelStats, ChannelSubscriber, Comment, CommentWithOwner, LikedVideoIds,
    Page, Playlist, PlaylistWithVideos, SubscribedChannel, Tweet, User, UserSummary, Video,
    VideoSummary, VideoWithOwner,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Cliptide API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::healthcheck::healthcheck,
        api::users::register,
        api::users::login,
        api::users::refresh_token,
        api::users::logout,
        api::users::change_password,
        api::users::current_user,
        api::users::update_account,
        api::users::update_avatar,
        api::users::update_cover_image,
        api::users::channel_profile,
        api::users::watch_history,
        api::videos::list_videos,
        api::videos::publish_video,
        api::videos::get_video,
        api::videos::update_video,
        api::videos::delete_video,
        api::videos::toggle_publish,
        api::comments::list_comments,
        api::comments::add_comment,
        api::comments::update_comment,
        api::comments::delete_comment,
        api::likes::toggle_video_like,
        api::likes::toggle_comment_like,
        api::likes::toggle_tweet_like,
        api::likes::liked_videos,
        api::playlists::create_playlist,
        api::playlists::get_playlist,
        api::playlists::update_playlist,
        api::playlists::delete_playlist,
        api::playlists::add_video,
        api::playlists::remove_video,
        api::playlists::list_user_playlists,
        api::subscriptions::toggle_subscription,
        api::subscriptions::channel_subscribers,
        api::subscriptions::subscribed_channels,
        api::tweets::create_tweet,
        api::tweets::list_user_tweets,
        api::tweets::update_tweet,
        api::tweets::delete_tweet,
        api::dashboard::channel_stats,
        api::dashboard::channel_videos,
    ),
    components(
        schemas(
            User, UserSummary, ChannelProfile,
            Video, VideoWithOwner, VideoSummary,
            Comment, CommentWithOwner,
            Tweet,
            Playlist, PlaylistWithVideos,
            ChannelSubscriber, SubscribedChannel,
            ChannelStats, LikedVideoIds,
            Page<VideoWithOwner>,
            Page<VideoSummary>,
            Page<CommentWithOwner>,
            // Request/response bodies
            api::users::RegisterForm,
            api::users::LoginRequest, api::users::LoginData,
            api::users::RefreshTokenRequest, api::users::TokenPairData,
            api::users::ChangePasswordRequest, api::users::UpdateAccountRequest,
            api::videos::PublishVideoForm, api::videos::PublishStatusData,
            api::comments::CommentRequest,
            api::playlists::CreatePlaylistRequest, api::playlists::UpdatePlaylistRequest,
            api::subscriptions::SubscriptionStatusData,
            api::tweets::TweetRequest,
            // Envelopes
            ApiResponse<User>,
            ErrorResponse,
        )
    ),
    tags(
        (name = "healthcheck", description = "Liveness endpoints"),
        (name = "users", description = "Account, session and channel profile endpoints"),
        (name = "videos", description = "Video feed and lifecycle endpoints"),
        (name = "comments", description = "Video comment endpoints"),
        (name = "likes", description = "Like toggle endpoints"),
        (name = "playlists", description = "Playlist management endpoints"),
        (name = "subscriptions", description = "Channel subscription endpoints"),
        (name = "tweets", description = "Tweet endpoints"),
        (name = "dashboard", description = "Channel dashboard endpoints")
    ),
    info(
        title = "Cliptide API",
        version = "0.1.0",
        description = "API for a video sharing platform: accounts, videos, comments, likes, playlists, subscriptions and tweets",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Render the spec as pretty-printed JSON
    pub fn to_json() -> String {
        Self::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec")
    }
}
