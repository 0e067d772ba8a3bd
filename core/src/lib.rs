//! Async client for the social.gal HTTP API.
//!
//! # Overview
//! A `Session` owns the credentials and, between `open` and `close`, a live
//! connection. Resource methods send one request each and map the JSON reply
//! into `User` / `Post` read models that borrow the session for follow-up
//! actions such as `follow`, `like` or `delete`.
//!
//! # Design
//! - Request construction (`endpoints::build_*`) is pure and returns plain
//!   `HttpRequest` data; I/O happens only behind the `Connection` trait.
//! - The default transport is `reqwest`; tests plug in their own `Connector`.
//! - Entities borrow the session (`User<'s>`, `Post<'s>`), so none can
//!   outlive it or close it.
//! - Partial profile updates use `MaybeUnset` so "not supplied" and "set to
//!   empty" stay distinct.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod endpoints;
pub mod error;
pub mod http;
pub mod params;
pub mod post;
pub mod session;
pub mod transport;
pub mod types;
pub mod unset;
pub mod user;

pub use error::ApiError;
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse};
pub use params::{NewPost, PostListing, PostQuery, SearchMode, UserSearchMode, UserUpdate};
pub use post::Post;
pub use session::{Credentials, Session, SessionBuilder, API_URL};
pub use transport::{Connection, Connector, ReqwestConnector};
pub use types::{PostActionsData, PostData, UserData};
pub use unset::MaybeUnset;
pub use user::User;
