//! Request builders for every social.gal endpoint.
//!
//! # Design
//! Each `build_*` function produces an `HttpRequest` and nothing else; it
//! never touches the network or the session. `Session` pairs each builder
//! with `Session::request` and an entity constructor. Paths are relative to
//! the API base URL.

use crate::http::{HttpMethod, HttpRequest};
use crate::params::{NewPost, PostListing, PostQuery, SearchMode, UserUpdate};
use crate::unset::MaybeUnset;

pub fn build_get_user(user_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, format!("/user/{user_id}"))
}

/// `PATCH /user`. Unset fields are left out of the body entirely; a supplied
/// avatar or banner also sets its `update_*` flag.
pub fn build_update_user(update: UserUpdate) -> HttpRequest {
    let mut req = HttpRequest::new(HttpMethod::Patch, "/user");

    if let MaybeUnset::Set(username) = update.username {
        req = req.form("username", username);
    }
    if let MaybeUnset::Set(about_me) = update.about_me {
        req = req.form("about_me", about_me);
    }
    if let MaybeUnset::Set(display_name) = update.display_name {
        req = req.form("display_name", display_name);
    }
    if let MaybeUnset::Set(avatar) = update.avatar {
        req = req.form("update_avatar", true).file("avatar_file", avatar);
    }
    if let MaybeUnset::Set(banner) = update.banner {
        req = req.form("update_banner", true).file("banner_file", banner);
    }
    req
}

pub fn build_follow_user(user_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, format!("/user/{user_id}/follow"))
}

pub fn build_unfollow_user(user_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Delete, format!("/user/{user_id}/follow"))
}

pub fn build_get_post(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, format!("/post/{post_id}"))
}

/// `GET /posts`. A timeline listing sends `search_mode`; a user listing
/// sends `user_id` and `user_search_mode` instead. An empty user id falls
/// back to the full timeline.
pub fn build_get_posts(query: &PostQuery) -> HttpRequest {
    let req = HttpRequest::new(HttpMethod::Get, "/posts")
        .query("offset", query.offset)
        .query("amount", query.amount);

    match &query.listing {
        PostListing::User { user_id, mode } if !user_id.is_empty() => req
            .query("user_id", user_id)
            .query("user_search_mode", mode),
        PostListing::User { .. } => req.query("search_mode", SearchMode::All),
        PostListing::Timeline(mode) => req.query("search_mode", mode),
    }
}

/// `POST /posts`. Attachments are named `file_0`, `file_1`, ... in order.
pub fn build_create_post(post: NewPost) -> HttpRequest {
    let mut req = HttpRequest::new(HttpMethod::Post, "/posts").form("post_content", post.content);

    if let Some(reply_id) = post.reply_id.filter(|id| !id.is_empty()) {
        req = req.form("reply_id", reply_id);
    }
    if let Some(quote_id) = post.quote_id.filter(|id| !id.is_empty()) {
        req = req.form("quote_id", quote_id);
    }
    for (i, file) in post.files.into_iter().enumerate() {
        req = req.file(format!("file_{i}"), file);
    }
    req
}

pub fn build_delete_post(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Delete, format!("/posts/{post_id}"))
}

pub fn build_like_post(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, format!("/posts/{post_id}/like"))
}

pub fn build_unlike_post(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Delete, format!("/posts/{post_id}/like"))
}

pub fn build_report_post(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, format!("/posts/{post_id}/report"))
}

pub fn build_get_post_replies(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Get, format!("/posts/{post_id}/replies"))
}

pub fn build_pin_post(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Post, format!("/posts/{post_id}/pin"))
}

pub fn build_unpin_post(post_id: &str) -> HttpRequest {
    HttpRequest::new(HttpMethod::Delete, format!("/posts/{post_id}/pin"))
}
