//! In-memory stand-in for the social.gal API.
//!
//! Every request acts as the seeded account `ACCOUNT_ID`; any non-empty
//! `Authorization` header together with a `session` cookie is accepted.

pub mod form;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        StatusCode,
    },
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

use form::FormFields;
pub use store::{Post, PostActions, PostRecord, Store, User, ACCOUNT_ID, CDN_URL, NEIGHBOR_ID};

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, String)>;

fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

fn bad_request(message: &str) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, message.to_string())
}

pub fn app() -> Router {
    app_with_store(Arc::new(RwLock::new(Store::seeded())))
}

/// Build the router over a caller-held store, so tests can inspect state.
pub fn app_with_store(db: Db) -> Router {
    Router::new()
        .route("/user", patch(update_user))
        .route("/user/{id}", get(get_user))
        .route("/user/{id}/follow", post(follow_user).delete(unfollow_user))
        .route("/post/{id}", get(get_post))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", delete(delete_post))
        .route("/posts/{id}/like", post(like_post).delete(unlike_post))
        .route("/posts/{id}/report", post(report_post))
        .route("/posts/{id}/replies", get(post_replies))
        .route("/posts/{id}/pin", post(pin_post).delete(unpin_post))
        .layer(middleware::from_fn(require_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_auth(req: Request, next: Next) -> Result<Response, (StatusCode, &'static str)> {
    let headers = req.headers();
    let has_token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    let has_session = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .any(|pair| pair.trim().starts_with("session="));

    if !has_token || !has_session {
        return Err((StatusCode::UNAUTHORIZED, "unauthorized"));
    }
    Ok(next.run(req).await)
}

// --- users ---

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    let store = db.read().await;
    let profile = store.profiles.get(&id).ok_or_else(|| not_found("user"))?;
    Ok(Json(store.render_user(profile)))
}

async fn update_user(State(db): State<Db>, fields: FormFields) -> ApiResult<Json<User>> {
    let mut store = db.write().await;

    let avatar_url = if fields.flag("update_avatar") {
        let file = fields
            .file("avatar_file")
            .ok_or_else(|| bad_request("update_avatar set without avatar_file"))?;
        Some(format!("{CDN_URL}/avatars/{}/{}", Uuid::new_v4(), file.file_name))
    } else {
        None
    };
    let banner_url = if fields.flag("update_banner") {
        let file = fields
            .file("banner_file")
            .ok_or_else(|| bad_request("update_banner set without banner_file"))?;
        Some(format!("{CDN_URL}/banners/{}/{}", Uuid::new_v4(), file.file_name))
    } else {
        None
    };

    let profile = store
        .profiles
        .get_mut(ACCOUNT_ID)
        .ok_or_else(|| not_found("user"))?;
    if let Some(username) = fields.get("username") {
        if username.is_empty() {
            return Err(bad_request("username cannot be empty"));
        }
        profile.username = username.to_string();
    }
    if let Some(about_me) = fields.get("about_me") {
        profile.about_me = about_me.to_string();
    }
    if let Some(display_name) = fields.get("display_name") {
        profile.display_name = display_name.to_string();
    }
    if let Some(url) = avatar_url {
        profile.avatar_url = url;
    }
    if let Some(url) = banner_url {
        profile.banner_url = url;
    }
    debug!(fields = fields.text.len(), files = fields.files.len(), "profile updated");

    let profile = profile.clone();
    Ok(Json(store.render_user(&profile)))
}

async fn follow_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if !store.profiles.contains_key(&id) {
        return Err(not_found("user"));
    }
    if id == ACCOUNT_ID {
        return Err(bad_request("cannot follow yourself"));
    }
    store.follows.insert((ACCOUNT_ID.to_string(), id));
    Ok(StatusCode::NO_CONTENT)
}

async fn unfollow_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if !store.profiles.contains_key(&id) {
        return Err(not_found("user"));
    }
    store.follows.remove(&(ACCOUNT_ID.to_string(), id));
    Ok(StatusCode::NO_CONTENT)
}

// --- posts ---

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_amount")]
    pub amount: usize,
    pub search_mode: Option<String>,
    pub user_id: Option<String>,
    pub user_search_mode: Option<String>,
}

fn default_amount() -> usize {
    24
}

async fn get_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Post>> {
    let store = db.read().await;
    store
        .post(&id)
        .and_then(|record| store.render_post(record))
        .map(Json)
        .ok_or_else(|| not_found("post"))
}

async fn list_posts(State(db): State<Db>, Query(params): Query<ListParams>) -> ApiResult<Json<Vec<Post>>> {
    let store = db.read().await;

    let keep: Box<dyn Fn(&PostRecord) -> bool + Send + '_> = match (&params.user_id, &params.search_mode) {
        (Some(user_id), _) => {
            let user_id = user_id.clone();
            match params.user_search_mode.as_deref().unwrap_or("posts") {
                "posts" => Box::new(move |p: &PostRecord| p.author_id == user_id && p.reply_id.is_none()),
                "replies" => Box::new(move |p: &PostRecord| p.author_id == user_id && p.reply_id.is_some()),
                _ => return Err(bad_request("invalid user_search_mode")),
            }
        }
        (None, mode) => match mode.as_deref().unwrap_or("all") {
            "all" => Box::new(|_: &PostRecord| true),
            "following" => {
                let store = &store;
                Box::new(move |p: &PostRecord| {
                    store
                        .follows
                        .contains(&(ACCOUNT_ID.to_string(), p.author_id.clone()))
                })
            }
            _ => return Err(bad_request("invalid search_mode")),
        },
    };

    let posts = store
        .posts
        .iter()
        .rev()
        .filter(|p| keep(*p))
        .skip(params.offset)
        .take(params.amount)
        .filter_map(|p| store.render_post(p))
        .collect();
    Ok(Json(posts))
}

async fn create_post(State(db): State<Db>, fields: FormFields) -> ApiResult<Json<Post>> {
    let mut store = db.write().await;

    let content = fields
        .get("post_content")
        .ok_or_else(|| bad_request("post_content is required"))?
        .to_string();
    let reply_id = fields.get("reply_id").map(str::to_string);
    let quote_id = fields.get("quote_id").map(str::to_string);
    for id in reply_id.iter().chain(quote_id.iter()) {
        if store.post(id).is_none() {
            return Err(not_found("post"));
        }
    }

    let mut files: Vec<(usize, &form::UploadedFile)> = fields
        .files
        .iter()
        .filter_map(|f| {
            f.field
                .strip_prefix("file_")
                .and_then(|i| i.parse().ok())
                .map(|i| (i, f))
        })
        .collect();
    files.sort_by_key(|(i, _)| *i);

    let id = Uuid::new_v4().to_string();
    let record = PostRecord {
        file_urls: files
            .iter()
            .map(|(i, f)| format!("{CDN_URL}/posts/{id}/{i}/{}", f.file_name))
            .collect(),
        id,
        author_id: ACCOUNT_ID.to_string(),
        content,
        timestamp: chrono::Utc::now().timestamp(),
        quote_id,
        reply_id,
    };
    debug!(id = %record.id, files = record.file_urls.len(), "post created");
    store.posts.push(record.clone());

    store
        .render_post(&record)
        .map(Json)
        .ok_or_else(|| not_found("user"))
}

async fn delete_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let record = store.post(&id).ok_or_else(|| not_found("post"))?;
    if record.author_id != ACCOUNT_ID {
        return Err((StatusCode::FORBIDDEN, "cannot delete another user's post".to_string()));
    }
    store.posts.retain(|p| p.id != id);
    store.likes.retain(|(post, _)| *post != id);
    if store.pinned.as_deref() == Some(id.as_str()) {
        store.pinned = None;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn like_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store.post(&id).ok_or_else(|| not_found("post"))?;
    store.likes.insert((id, ACCOUNT_ID.to_string()));
    Ok(StatusCode::NO_CONTENT)
}

async fn unlike_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store.post(&id).ok_or_else(|| not_found("post"))?;
    store.likes.remove(&(id, ACCOUNT_ID.to_string()));
    Ok(StatusCode::NO_CONTENT)
}

async fn report_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store.post(&id).ok_or_else(|| not_found("post"))?;
    store.reports.push(id);
    Ok(StatusCode::NO_CONTENT)
}

async fn post_replies(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Vec<Post>>> {
    let store = db.read().await;
    store.post(&id).ok_or_else(|| not_found("post"))?;
    let replies = store
        .posts
        .iter()
        .filter(|p| p.reply_id.as_deref() == Some(id.as_str()))
        .filter_map(|p| store.render_post(p))
        .collect();
    Ok(Json(replies))
}

async fn pin_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let record = store.post(&id).ok_or_else(|| not_found("post"))?;
    if record.author_id != ACCOUNT_ID {
        return Err((StatusCode::FORBIDDEN, "cannot pin another user's post".to_string()));
    }
    store.pinned = Some(id);
    Ok(StatusCode::NO_CONTENT)
}

async fn unpin_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if store.pinned.as_deref() != Some(id.as_str()) {
        return Err(bad_request("post is not pinned"));
    }
    store.pinned = None;
    Ok(StatusCode::NO_CONTENT)
}
