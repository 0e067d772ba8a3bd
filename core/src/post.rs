//! Post read model.
//!
//! # Design
//! `Post::from_data` maps the author and any quoted or replied-to post in one
//! pass, recursing through the nested `PostData`. Every level borrows the same
//! `Session`, so actions on a nested post (`like`, `reply`, ...) go through
//! the session that fetched the outer one.

use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::params::NewPost;
use crate::session::Session;
use crate::types::PostData;
use crate::user::{from_epoch_seconds, User};

/// A post, with any quoted or replied-to post mapped eagerly.
///
/// Nesting depth is whatever the server sends; JSON decoding stops at
/// serde_json's recursion limit long before the stack would.
#[derive(Debug, Clone)]
pub struct Post<'s> {
    session: &'s Session,
    pub id: String,
    pub author: User<'s>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub like_count: u64,
    /// Whether the session's account liked this post.
    pub liked: bool,
    /// Whether the session's account reposted this post.
    pub reposted: bool,
    pub quoted_post: Option<Box<Post<'s>>>,
    pub replied_post: Option<Box<Post<'s>>>,
    pub file_urls: Vec<String>,
    pub share_url: String,
}

impl<'s> Post<'s> {
    pub fn from_data(session: &'s Session, data: PostData) -> Result<Self, ApiError> {
        let quoted_post = data
            .quoted_post
            .map(|quoted| Post::from_data(session, *quoted).map(Box::new))
            .transpose()?;
        let replied_post = data
            .replied_post
            .map(|replied| Post::from_data(session, *replied).map(Box::new))
            .transpose()?;

        Ok(Self {
            session,
            author: User::from_data(session, data.author)?,
            timestamp: from_epoch_seconds("timestamp", data.timestamp)?,
            id: data.id,
            content: data.content,
            like_count: data.actions.like_count,
            liked: data.actions.post_liked,
            reposted: data.actions.post_reposted,
            quoted_post,
            replied_post,
            file_urls: data.file_urls,
            share_url: data.share_url,
        })
    }

    /// The session this post was fetched through.
    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub async fn delete(&self) -> Result<(), ApiError> {
        self.session.delete_post(&self.id).await
    }

    pub async fn report(&self) -> Result<(), ApiError> {
        self.session.report_post(&self.id).await
    }

    pub async fn like(&self) -> Result<(), ApiError> {
        self.session.like_post(&self.id).await
    }

    pub async fn unlike(&self) -> Result<(), ApiError> {
        self.session.unlike_post(&self.id).await
    }

    pub async fn pin(&self) -> Result<(), ApiError> {
        self.session.pin_post(&self.id).await
    }

    pub async fn unpin(&self) -> Result<(), ApiError> {
        self.session.unpin_post(&self.id).await
    }

    pub async fn replies(&self) -> Result<Vec<Post<'s>>, ApiError> {
        self.session.get_post_replies(&self.id).await
    }

    /// Publish a text reply to this post.
    pub async fn reply(&self, content: impl Into<String>) -> Result<Post<'s>, ApiError> {
        self.session
            .create_post(NewPost::new(content).reply_to(self.id.clone()))
            .await
    }

    /// Publish a new post quoting this one.
    pub async fn quote(&self, content: impl Into<String>) -> Result<Post<'s>, ApiError> {
        self.session
            .create_post(NewPost::new(content).quoting(self.id.clone()))
            .await
    }
}
