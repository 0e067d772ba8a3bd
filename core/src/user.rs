//! User read model.
//!
//! # Design
//! A `User` is built from `UserData` by `User::from_data` and keeps a shared
//! borrow of the `Session` that fetched it. Follow-up actions (`follow`,
//! `posts`) reuse that session, and the borrow keeps the session from being
//! closed or dropped while the entity is alive. Empty attribute tags are
//! dropped and epoch seconds become UTC timestamps.

use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::params::{PostQuery, UserSearchMode};
use crate::post::Post;
use crate::session::Session;
use crate::types::UserData;

/// A user profile as seen by the session's credentials.
///
/// Read-only: profile changes go through `Session::update_user`, which
/// returns a fresh `User`.
#[derive(Debug, Clone)]
pub struct User<'s> {
    session: &'s Session,
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub banner_url: String,
    pub about_me: String,
    /// Attribute tags in server order, with empty entries removed.
    pub attributes: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Whether the session's account follows this user.
    pub following: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
}

impl<'s> User<'s> {
    pub fn from_data(session: &'s Session, data: UserData) -> Result<Self, ApiError> {
        Ok(Self {
            session,
            created_at: from_epoch_seconds("account_created_at", data.account_created_at)?,
            id: data.id,
            username: data.username,
            display_name: data.display_name,
            avatar_url: data.avatar_url,
            banner_url: data.banner_url,
            about_me: data.about_me,
            attributes: data
                .user_attributes
                .into_iter()
                .filter(|attr| !attr.is_empty())
                .collect(),
            following: data.following,
            follower_count: data.follower_count,
            following_count: data.following_count,
            post_count: data.post_count,
        })
    }

    /// The session this user was fetched through.
    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub async fn follow(&self) -> Result<(), ApiError> {
        self.session.follow_user(&self.id).await
    }

    pub async fn unfollow(&self) -> Result<(), ApiError> {
        self.session.unfollow_user(&self.id).await
    }

    /// First page of this user's posts or replies.
    pub async fn posts(&self, mode: UserSearchMode) -> Result<Vec<Post<'s>>, ApiError> {
        self.session.get_posts(&PostQuery::user(self.id.clone(), mode)).await
    }
}

pub(crate) fn from_epoch_seconds(field: &str, seconds: i64) -> Result<DateTime<Utc>, ApiError> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        ApiError::DeserializationError(format!("{field}: timestamp {seconds} out of range"))
    })
}
