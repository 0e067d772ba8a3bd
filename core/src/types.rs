//! Wire DTOs for the social.gal API.
//!
//! # Design
//! These mirror the JSON the server sends, field for field. They are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift between the two. Conversion into the `User` / `Post` read models
//! happens in the `user` and `post`
//! modules.

use serde::{Deserialize, Serialize};

/// A user as returned by `GET /user/{id}` and embedded in posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub banner_url: String,
    pub about_me: String,
    pub user_attributes: Vec<String>,
    /// Seconds since the Unix epoch.
    pub account_created_at: i64,
    pub following: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
}

/// Per-viewer interaction state of a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostActionsData {
    pub like_count: u64,
    pub post_liked: bool,
    pub post_reposted: bool,
}

/// A post. `quoted_post` and `replied_post` nest the same shape; a missing
/// key is treated the same as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostData {
    pub id: String,
    pub author: UserData,
    pub content: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub actions: PostActionsData,
    #[serde(default)]
    pub quoted_post: Option<Box<PostData>>,
    #[serde(default)]
    pub replied_post: Option<Box<PostData>>,
    pub file_urls: Vec<String>,
    pub share_url: String,
}
