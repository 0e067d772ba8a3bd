//! Authenticated session with an explicit connection lifecycle.
//!
//! # Design
//! A `Session` stores its credentials from construction, but it only holds a
//! live connection between `open` and `close`. Every request-issuing method
//! fails with `ApiError::NotOpen` outside that window, so a closed session
//! never reuses a stale connection. `open` on an already-open session is an
//! error rather than a silent leak.
//!
//! Resource methods are thin: pick the `endpoints::build_*` request, pass it
//! through `request`, and map the JSON into a `User` or `Post` that borrows
//! this session for follow-up actions. Nothing is retried or cached, and no
//! timeout is applied here; wrap individual calls if a deadline is needed.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::endpoints;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{NewPost, PostQuery, UserUpdate};
use crate::post::Post;
use crate::transport::{Connection, Connector, ReqwestConnector};
use crate::types::{PostData, UserData};
use crate::user::User;

/// Base URL of the public API.
pub const API_URL: &str = "https://social.gal/api";

/// `User-Agent` sent unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("Bot (socialgal-rs/", env!("CARGO_PKG_VERSION"), ")");

/// The bearer token and session cookie a session authenticates with.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    session: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            session: session.into(),
        }
    }

    /// Sent verbatim as the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Sent as the `session` cookie.
    pub fn session(&self) -> &str {
        &self.session
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("session", &"<redacted>")
            .finish()
    }
}

/// Configures a `Session` before it is built.
pub struct SessionBuilder {
    credentials: Credentials,
    base_url: String,
    user_agent: String,
    connector: Arc<dyn Connector>,
}

impl SessionBuilder {
    /// Point the session at another server. A trailing `/` is stripped.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn connector(mut self, connector: impl Connector + 'static) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    pub fn build(self) -> Session {
        Session {
            credentials: self.credentials,
            base_url: self.base_url,
            user_agent: self.user_agent,
            connector: self.connector,
            connection: None,
        }
    }
}

/// A client session for the social.gal API.
pub struct Session {
    credentials: Credentials,
    base_url: String,
    user_agent: String,
    connector: Arc<dyn Connector>,
    connection: Option<Box<dyn Connection>>,
}

impl Session {
    /// A session against the public API using the default `reqwest` transport.
    pub fn new(token: impl Into<String>, session: impl Into<String>) -> Self {
        Self::builder(token, session).build()
    }

    pub fn builder(token: impl Into<String>, session: impl Into<String>) -> SessionBuilder {
        SessionBuilder {
            credentials: Credentials::new(token, session),
            base_url: API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connector: Arc::new(ReqwestConnector),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Acquire a connection configured with this session's credentials.
    ///
    /// No network traffic happens here; connect errors surface on the first
    /// request.
    pub fn open(&mut self) -> Result<(), ApiError> {
        if self.connection.is_some() {
            return Err(ApiError::AlreadyOpen);
        }
        let connection = self.connector.connect(&self.credentials, &self.user_agent)?;
        self.connection = Some(connection);
        debug!(base_url = %self.base_url, "session opened");
        Ok(())
    }

    /// Shut the connection down. Closing a closed session does nothing.
    pub async fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.shutdown().await;
            debug!(base_url = %self.base_url, "session closed");
        }
    }

    /// Open the session, run `f`, then close it whether `f` succeeded or not.
    ///
    /// ```no_run
    /// # use socialgal_core::{ApiError, Session};
    /// # async fn run() -> Result<(), ApiError> {
    /// let name = Session::new("token", "session")
    ///     .scoped(|session| {
    ///         Box::pin(async move {
    ///             let user = session.get_user("some-id").await?;
    ///             Ok(user.display_name)
    ///         })
    ///     })
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub async fn scoped<T, F>(mut self, f: F) -> Result<T, ApiError>
    where
        F: for<'s> FnOnce(&'s Session) -> BoxFuture<'s, Result<T, ApiError>>,
    {
        self.open()?;
        let result = f(&self).await;
        self.close().await;
        result
    }

    /// Send one request and fail on any status >= 400.
    ///
    /// The response is returned undecoded. Exactly one HTTP call is made.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let connection = self.connection.as_ref().ok_or(ApiError::NotOpen)?;
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, %url, "sending request");

        let response = connection.send(&url, &request).await?;
        check_status(response)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User<'_>, ApiError> {
        let data: UserData = self.request(endpoints::build_get_user(user_id)).await?.json()?;
        User::from_data(self, data)
    }

    /// Apply a partial profile update. The returned user is the server's view
    /// after the update.
    pub async fn update_user(&self, update: UserUpdate) -> Result<User<'_>, ApiError> {
        let data: UserData = self.request(endpoints::build_update_user(update)).await?.json()?;
        User::from_data(self, data)
    }

    pub async fn follow_user(&self, user_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_follow_user(user_id)).await?;
        Ok(())
    }

    pub async fn unfollow_user(&self, user_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_unfollow_user(user_id)).await?;
        Ok(())
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post<'_>, ApiError> {
        let data: PostData = self.request(endpoints::build_get_post(post_id)).await?.json()?;
        Post::from_data(self, data)
    }

    pub async fn get_posts(&self, query: &PostQuery) -> Result<Vec<Post<'_>>, ApiError> {
        let data: Vec<PostData> = self.request(endpoints::build_get_posts(query)).await?.json()?;
        self.map_posts(data)
    }

    pub async fn create_post(&self, post: NewPost) -> Result<Post<'_>, ApiError> {
        let data: PostData = self.request(endpoints::build_create_post(post)).await?.json()?;
        Post::from_data(self, data)
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_delete_post(post_id)).await?;
        Ok(())
    }

    pub async fn like_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_like_post(post_id)).await?;
        Ok(())
    }

    pub async fn unlike_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_unlike_post(post_id)).await?;
        Ok(())
    }

    pub async fn report_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_report_post(post_id)).await?;
        Ok(())
    }

    pub async fn get_post_replies(&self, post_id: &str) -> Result<Vec<Post<'_>>, ApiError> {
        let data: Vec<PostData> = self
            .request(endpoints::build_get_post_replies(post_id))
            .await?
            .json()?;
        self.map_posts(data)
    }

    pub async fn pin_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_pin_post(post_id)).await?;
        Ok(())
    }

    pub async fn unpin_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.request(endpoints::build_unpin_post(post_id)).await?;
        Ok(())
    }

    fn map_posts(&self, data: Vec<PostData>) -> Result<Vec<Post<'_>>, ApiError> {
        data.into_iter().map(|post| Post::from_data(self, post)).collect()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.connection.take().is_some() {
            warn!(base_url = %self.base_url, "session dropped while open; connection released without shutdown");
        }
    }
}

/// Any status >= 400 becomes `RequestFailed` carrying the raw body.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.status < 400 {
        return Ok(response);
    }
    warn!(status = response.status, "request failed");
    Err(ApiError::RequestFailed {
        status: response.status,
        body: response.body,
    })
}
