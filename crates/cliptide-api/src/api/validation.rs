// Input validation for the public API
//
// The validation gate runs before any handler logic. Failures are
// collected per field and reported together in the error envelope's
// `errors` list, so a client fixing a form sees everything at once.

use crate::api::common::{ApiError, ApiResult};
use crate::storage::VideoSortKey;

// =============================================================================
// Input Limits
// =============================================================================

/// Minimum username length. Anything shorter collides too easily.
pub const MIN_USERNAME_CHARS: usize = 3;

/// Minimum password length, combined with the composition rules below.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Minimum full name length at registration.
pub const MIN_FULLNAME_CHARS: usize = 3;

/// Minimum video title length.
pub const MIN_TITLE_CHARS: usize = 3;

/// Maximum video description length.
/// Descriptions are rendered inline in feeds; longer text belongs elsewhere.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Maximum tweet length.
pub const MAX_TWEET_CHARS: usize = 280;

/// Playlist name bounds.
pub const MIN_PLAYLIST_NAME_CHARS: usize = 3;
pub const MAX_PLAYLIST_NAME_CHARS: usize = 50;

/// Maximum playlist description length.
pub const MAX_PLAYLIST_DESCRIPTION_CHARS: usize = 200;

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Hard cap on the dashboard videos page size.
/// The dashboard renders dense rows; larger pages only hurt the store.
pub const MAX_DASHBOARD_LIMIT: i64 = 50;

/// Maximum accepted image upload (avatar, cover, thumbnail).
/// 5 MB covers any reasonable still image.
pub const MAX_IMAGE_UPLOAD_BYTES: usize = 5 * 1024 * 1024; // 5 MB

/// Maximum accepted video upload.
/// 50 MB keeps request bodies bounded; longer media belongs on the CDN
/// via resumable upload, which this API does not offer.
pub const MAX_VIDEO_UPLOAD_BYTES: usize = 50 * 1024 * 1024; // 50 MB

/// Accepted image content types.
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Accepted video content types.
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4", "video/quicktime"];

// =============================================================================
// Validator
// =============================================================================

/// Accumulates per-field failures for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless `condition` holds
    pub fn require(&mut self, condition: bool, message: &str) {
        if !condition {
            self.errors.push(message.to_string());
        }
    }

    pub fn finish(self) -> ApiResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            tracing::warn!(errors = ?self.errors, "request validation failed");
            Err(ApiError::Validation(self.errors))
        }
    }
}

// =============================================================================
// Field Rules
// =============================================================================

fn check_username(v: &mut Validator, username: &str) {
    v.require(
        username.chars().count() >= MIN_USERNAME_CHARS,
        "username must be at least 3 characters",
    );
    v.require(
        !username.is_empty()
            && username
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
        "username must contain only lowercase letters and digits",
    );
}

/// Structural email check: non-empty local part, dotted domain, no spaces
fn is_plausible_email(email: &str) -> bool {
    if email.contains(' ') {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn check_email(v: &mut Validator, email: &str) {
    v.require(is_plausible_email(email), "email must be a valid address");
}

fn check_password(v: &mut Validator, field: &str, password: &str) {
    v.require(
        password.chars().count() >= MIN_PASSWORD_CHARS,
        &format!("{field} must be at least 8 characters"),
    );
    v.require(
        password.chars().any(|c| c.is_ascii_uppercase()),
        &format!("{field} must contain an uppercase letter"),
    );
    v.require(
        password.chars().any(|c| c.is_ascii_lowercase()),
        &format!("{field} must contain a lowercase letter"),
    );
    v.require(
        password.chars().any(|c| c.is_ascii_digit()),
        &format!("{field} must contain a digit"),
    );
    v.require(
        password.chars().any(|c| !c.is_alphanumeric()),
        &format!("{field} must contain a special character"),
    );
}

// =============================================================================
// Request Rules
// =============================================================================

pub fn validate_register(
    username: &str,
    email: &str,
    fullname: &str,
    password: &str,
) -> ApiResult<()> {
    let mut v = Validator::new();
    check_username(&mut v, username);
    check_email(&mut v, email);
    v.require(
        fullname.trim().chars().count() >= MIN_FULLNAME_CHARS,
        "fullname must be at least 3 characters",
    );
    check_password(&mut v, "password", password);
    v.finish()
}

pub fn validate_login(
    username: Option<&str>,
    email: Option<&str>,
    password: &str,
) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(
        username.map(|s| !s.is_empty()).unwrap_or(false)
            || email.map(|s| !s.is_empty()).unwrap_or(false),
        "username or email is required",
    );
    v.require(!password.is_empty(), "password is required");
    v.finish()
}

pub fn validate_change_password(old_password: &str, new_password: &str) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(!old_password.is_empty(), "oldPassword is required");
    check_password(&mut v, "newPassword", new_password);
    v.require(
        old_password != new_password,
        "newPassword must differ from oldPassword",
    );
    v.finish()
}

pub fn validate_account_update(fullname: Option<&str>, email: Option<&str>) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(
        fullname.is_some() || email.is_some(),
        "fullname or email is required",
    );
    if let Some(fullname) = fullname {
        v.require(
            fullname.trim().chars().count() >= MIN_FULLNAME_CHARS,
            "fullname must be at least 3 characters",
        );
        v.require(
            fullname.chars().all(|c| c.is_alphabetic() || c == ' '),
            "fullname must contain only letters and spaces",
        );
    }
    if let Some(email) = email {
        check_email(&mut v, email);
    }
    v.finish()
}

pub fn validate_video_publish(title: &str, description: Option<&str>) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(
        title.trim().chars().count() >= MIN_TITLE_CHARS,
        "title must be at least 3 characters",
    );
    if let Some(description) = description {
        v.require(
            description.chars().count() <= MAX_DESCRIPTION_CHARS,
            "description must be at most 500 characters",
        );
    }
    v.finish()
}

pub fn validate_video_update(
    title: Option<&str>,
    description: Option<&str>,
    has_thumbnail: bool,
) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(
        title.is_some() || description.is_some() || has_thumbnail,
        "title, description or thumbnail is required",
    );
    if let Some(title) = title {
        v.require(
            title.trim().chars().count() >= MIN_TITLE_CHARS,
            "title must be at least 3 characters",
        );
    }
    if let Some(description) = description {
        v.require(
            description.chars().count() <= MAX_DESCRIPTION_CHARS,
            "description must be at most 500 characters",
        );
    }
    v.finish()
}

pub fn validate_comment_content(content: &str) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(!content.trim().is_empty(), "content is required");
    v.finish()
}

pub fn validate_tweet_content(content: &str) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(!content.trim().is_empty(), "content is required");
    v.require(
        content.chars().count() <= MAX_TWEET_CHARS,
        "content must be at most 280 characters",
    );
    v.finish()
}

pub fn validate_playlist_create(name: &str, description: Option<&str>) -> ApiResult<()> {
    let mut v = Validator::new();
    check_playlist_name(&mut v, name);
    check_playlist_description(&mut v, description);
    v.finish()
}

pub fn validate_playlist_update(name: Option<&str>, description: Option<&str>) -> ApiResult<()> {
    let mut v = Validator::new();
    v.require(
        name.is_some() || description.is_some(),
        "name or description is required",
    );
    if let Some(name) = name {
        check_playlist_name(&mut v, name);
    }
    check_playlist_description(&mut v, description);
    v.finish()
}

fn check_playlist_name(v: &mut Validator, name: &str) {
    let chars = name.trim().chars().count();
    v.require(
        (MIN_PLAYLIST_NAME_CHARS..=MAX_PLAYLIST_NAME_CHARS).contains(&chars),
        "name must be between 3 and 50 characters",
    );
}

fn check_playlist_description(v: &mut Validator, description: Option<&str>) {
    if let Some(description) = description {
        v.require(
            description.chars().count() <= MAX_PLAYLIST_DESCRIPTION_CHARS,
            "description must be at most 200 characters",
        );
    }
}

/// Resolve page/limit with defaults, rejecting non-positive values.
/// `max_limit` caps the page size where an endpoint demands it.
pub fn validate_pagination(
    page: Option<i64>,
    limit: Option<i64>,
    max_limit: Option<i64>,
) -> ApiResult<(i64, i64)> {
    let mut v = Validator::new();
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    v.require(page >= 1, "page must be a positive integer");
    v.require(limit >= 1, "limit must be a positive integer");
    if let Some(max) = max_limit {
        v.require(limit <= max, &format!("limit must be at most {max}"));
    }
    v.finish()?;
    Ok((page, limit))
}

/// Resolve sortBy/sortType against the whitelist, defaulting to newest
/// first
pub fn validate_video_sort(
    sort_by: Option<&str>,
    sort_type: Option<&str>,
) -> ApiResult<(VideoSortKey, bool)> {
    let mut v = Validator::new();

    let sort_key = match sort_by {
        None => Some(VideoSortKey::CreatedAt),
        Some(s) => VideoSortKey::parse(s),
    };
    v.require(
        sort_key.is_some(),
        "sortBy must be one of createdAt, views, duration",
    );

    let sort_asc = match sort_type {
        None | Some("desc") => Some(false),
        Some("asc") => Some(true),
        Some(_) => None,
    };
    v.require(sort_asc.is_some(), "sortType must be asc or desc");

    v.finish()?;
    // Both are Some once finish() passed
    Ok((
        sort_key.unwrap_or(VideoSortKey::CreatedAt),
        sort_asc.unwrap_or(false),
    ))
}
