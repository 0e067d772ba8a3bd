//! Caller-side inputs for the listing, creation and profile-update endpoints.

use std::fmt;

use crate::http::FilePart;
use crate::unset::MaybeUnset;

/// Page size used by `PostQuery::default`.
pub const DEFAULT_AMOUNT: u32 = 24;

/// Which global listing to read when no user is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    All,
    Following,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchMode::All => "all",
            SearchMode::Following => "following",
        })
    }
}

/// Which of a user's posts to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSearchMode {
    #[default]
    Posts,
    Replies,
}

impl fmt::Display for UserSearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserSearchMode::Posts => "posts",
            UserSearchMode::Replies => "replies",
        })
    }
}

/// The two listing semantics served by `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostListing {
    Timeline(SearchMode),
    User { user_id: String, mode: UserSearchMode },
}

impl Default for PostListing {
    fn default() -> Self {
        PostListing::Timeline(SearchMode::default())
    }
}

/// Parameters for `GET /posts`. Offsets are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub offset: u32,
    pub amount: u32,
    pub listing: PostListing,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            amount: DEFAULT_AMOUNT,
            listing: PostListing::default(),
        }
    }
}

impl PostQuery {
    pub fn timeline(mode: SearchMode) -> Self {
        Self {
            listing: PostListing::Timeline(mode),
            ..Self::default()
        }
    }

    pub fn user(user_id: impl Into<String>, mode: UserSearchMode) -> Self {
        Self {
            listing: PostListing::User {
                user_id: user_id.into(),
                mode,
            },
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }
}

/// A post to publish. A post may be a reply and a quote at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub reply_id: Option<String>,
    pub quote_id: Option<String>,
    pub files: Vec<FilePart>,
}

impl NewPost {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn reply_to(mut self, post_id: impl Into<String>) -> Self {
        self.reply_id = Some(post_id.into());
        self
    }

    pub fn quoting(mut self, post_id: impl Into<String>) -> Self {
        self.quote_id = Some(post_id.into());
        self
    }

    /// Attachments keep the order in which they are added.
    pub fn file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }
}

/// A partial profile update. Only fields that were set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: MaybeUnset<String>,
    pub about_me: MaybeUnset<String>,
    pub display_name: MaybeUnset<String>,
    pub avatar: MaybeUnset<FilePart>,
    pub banner: MaybeUnset<FilePart>,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = MaybeUnset::Set(username.into());
        self
    }

    pub fn about_me(mut self, about_me: impl Into<String>) -> Self {
        self.about_me = MaybeUnset::Set(about_me.into());
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = MaybeUnset::Set(display_name.into());
        self
    }

    pub fn avatar(mut self, file: FilePart) -> Self {
        self.avatar = MaybeUnset::Set(file);
        self
    }

    pub fn banner(mut self, file: FilePart) -> Self {
        self.banner = MaybeUnset::Set(file);
        self
    }
}
