use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Id of the account every authorized request acts as.
pub const ACCOUNT_ID: &str = "2b7d3f8e-0c1a-4e55-9d0b-6a1f2c3d4e01";
/// Id of a second seeded user the account can follow.
pub const NEIGHBOR_ID: &str = "2b7d3f8e-0c1a-4e55-9d0b-6a1f2c3d4e02";

pub const CDN_URL: &str = "https://cdn.social.gal";
pub const SHARE_URL: &str = "https://social.gal/post";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub banner_url: String,
    pub about_me: String,
    pub user_attributes: Vec<String>,
    pub account_created_at: i64,
    pub following: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PostActions {
    pub like_count: u64,
    pub post_liked: bool,
    pub post_reposted: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: User,
    pub content: String,
    pub timestamp: i64,
    pub actions: PostActions,
    pub quoted_post: Option<Box<Post>>,
    pub replied_post: Option<Box<Post>>,
    pub file_urls: Vec<String>,
    pub share_url: String,
}

#[derive(Clone, Debug)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub banner_url: String,
    pub about_me: String,
    pub user_attributes: Vec<String>,
    pub account_created_at: i64,
}

#[derive(Clone, Debug)]
pub struct PostRecord {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub timestamp: i64,
    pub quote_id: Option<String>,
    pub reply_id: Option<String>,
    pub file_urls: Vec<String>,
}

/// Everything the mock API knows. Posts are kept in creation order.
#[derive(Debug, Default)]
pub struct Store {
    pub profiles: HashMap<String, Profile>,
    pub posts: Vec<PostRecord>,
    /// (follower, followed)
    pub follows: HashSet<(String, String)>,
    /// (post, user)
    pub likes: HashSet<(String, String)>,
    pub pinned: Option<String>,
    pub reports: Vec<String>,
}

impl Store {
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.insert_profile(Profile {
            id: ACCOUNT_ID.to_string(),
            username: "botty".to_string(),
            display_name: "Botty".to_string(),
            avatar_url: format!("{CDN_URL}/avatars/default.png"),
            banner_url: format!("{CDN_URL}/banners/default.png"),
            about_me: "beep".to_string(),
            user_attributes: vec![String::new(), "bot".to_string()],
            account_created_at: 1_700_000_000,
        });
        store.insert_profile(Profile {
            id: NEIGHBOR_ID.to_string(),
            username: "neighbor".to_string(),
            display_name: "Neighbor".to_string(),
            avatar_url: format!("{CDN_URL}/avatars/default.png"),
            banner_url: format!("{CDN_URL}/banners/default.png"),
            about_me: String::new(),
            user_attributes: Vec::new(),
            account_created_at: 1_650_000_000,
        });
        store
    }

    pub fn insert_profile(&mut self, profile: Profile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    pub fn post(&self, id: &str) -> Option<&PostRecord> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Render a profile as seen by `ACCOUNT_ID`.
    pub fn render_user(&self, profile: &Profile) -> User {
        let follower_count = self.follows.iter().filter(|(_, followed)| *followed == profile.id).count();
        let following_count = self.follows.iter().filter(|(follower, _)| *follower == profile.id).count();
        let post_count = self.posts.iter().filter(|p| p.author_id == profile.id).count();
        User {
            id: profile.id.clone(),
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            banner_url: profile.banner_url.clone(),
            about_me: profile.about_me.clone(),
            user_attributes: profile.user_attributes.clone(),
            account_created_at: profile.account_created_at,
            following: self
                .follows
                .contains(&(ACCOUNT_ID.to_string(), profile.id.clone())),
            follower_count: follower_count as u64,
            following_count: following_count as u64,
            post_count: post_count as u64,
        }
    }

    /// Render a post with its quoted and replied-to posts nested. A reference
    /// to a deleted post renders as `null`.
    pub fn render_post(&self, record: &PostRecord) -> Option<Post> {
        let author = self.profiles.get(&record.author_id)?;
        let nested = |id: &Option<String>| {
            id.as_deref()
                .and_then(|id| self.post(id))
                .and_then(|p| self.render_post(p))
                .map(Box::new)
        };
        let like_count = self.likes.iter().filter(|(post, _)| *post == record.id).count();
        Some(Post {
            id: record.id.clone(),
            author: self.render_user(author),
            content: record.content.clone(),
            timestamp: record.timestamp,
            actions: PostActions {
                like_count: like_count as u64,
                post_liked: self
                    .likes
                    .contains(&(record.id.clone(), ACCOUNT_ID.to_string())),
                post_reposted: false,
            },
            quoted_post: nested(&record.quote_id),
            replied_post: nested(&record.reply_id),
            file_urls: record.file_urls.clone(),
            share_url: format!("{SHARE_URL}/{}", record.id),
        })
    }
}
