//! Verify request builders and entity mapping against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Request vectors describe builder inputs and the expected method, path,
//! query, form fields and attachment field names. Mapping vectors describe
//! server payloads and the fields the mapped `User` / `Post` must expose.

use serde_json::Value;
use socialgal_core::endpoints::{build_create_post, build_get_posts, build_update_user};
use socialgal_core::{
    ApiError, FilePart, HttpMethod, HttpRequest, NewPost, Post, PostData, PostQuery, SearchMode, Session, User,
    UserData, UserSearchMode, UserUpdate,
};

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn str_field<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str)
}

fn file(name: &str) -> FilePart {
    FilePart::new(name, name.as_bytes().to_vec())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn posts_query(input: &Value) -> PostQuery {
    let mut query = match str_field(input, "user_id") {
        Some(user_id) => {
            let mode = match str_field(input, "user_search_mode") {
                Some("replies") => UserSearchMode::Replies,
                _ => UserSearchMode::Posts,
            };
            PostQuery::user(user_id, mode)
        }
        None => {
            let mode = match str_field(input, "search_mode") {
                Some("following") => SearchMode::Following,
                _ => SearchMode::All,
            };
            PostQuery::timeline(mode)
        }
    };
    if let Some(offset) = input.get("offset").and_then(Value::as_u64) {
        query = query.with_offset(offset as u32);
    }
    if let Some(amount) = input.get("amount").and_then(Value::as_u64) {
        query = query.with_amount(amount as u32);
    }
    query
}

fn user_update(input: &Value) -> UserUpdate {
    let mut update = UserUpdate::new();
    if let Some(username) = str_field(input, "username") {
        update = update.username(username);
    }
    if let Some(about_me) = str_field(input, "about_me") {
        update = update.about_me(about_me);
    }
    if let Some(display_name) = str_field(input, "display_name") {
        update = update.display_name(display_name);
    }
    if let Some(avatar) = str_field(input, "avatar") {
        update = update.avatar(file(avatar));
    }
    if let Some(banner) = str_field(input, "banner") {
        update = update.banner(file(banner));
    }
    update
}

fn new_post(input: &Value) -> NewPost {
    let mut post = NewPost::new(str_field(input, "content").unwrap());
    if let Some(reply_id) = str_field(input, "reply_id") {
        post = post.reply_to(reply_id);
    }
    if let Some(quote_id) = str_field(input, "quote_id") {
        post = post.quoting(quote_id);
    }
    for name in input.get("files").and_then(Value::as_array).into_iter().flatten() {
        post = post.file(file(name.as_str().unwrap()));
    }
    post
}

fn build(operation: &str, input: &Value) -> HttpRequest {
    match operation {
        "get_posts" => build_get_posts(&posts_query(input)),
        "update_user" => build_update_user(user_update(input)),
        "create_post" => build_create_post(new_post(input)),
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(case["operation"].as_str().unwrap(), &case["input"]);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(req.query, pairs(&expected["query"]), "{name}: query");
        assert_eq!(req.form, pairs(&expected["form"]), "{name}: form");

        let file_fields: Vec<&str> = req.files.iter().map(|(field, _)| field.as_str()).collect();
        let expected_files: Vec<&str> = expected["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_str().unwrap())
            .collect();
        assert_eq!(file_fields, expected_files, "{name}: files");
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn assert_user(user: &User<'_>, expected: &Value, name: &str) {
    assert_eq!(user.id, expected["id"].as_str().unwrap(), "{name}: id");
    assert_eq!(user.username, expected["username"].as_str().unwrap(), "{name}: username");
    assert_eq!(user.display_name, expected["display_name"].as_str().unwrap(), "{name}: display_name");
    assert_eq!(user.avatar_url, expected["avatar_url"].as_str().unwrap(), "{name}: avatar_url");
    assert_eq!(user.banner_url, expected["banner_url"].as_str().unwrap(), "{name}: banner_url");
    assert_eq!(user.about_me, expected["about_me"].as_str().unwrap(), "{name}: about_me");
    let attributes: Vec<String> = serde_json::from_value(expected["attributes"].clone()).unwrap();
    assert_eq!(user.attributes, attributes, "{name}: attributes");
    assert_eq!(user.created_at.to_rfc3339(), expected["created_at"].as_str().unwrap(), "{name}: created_at");
    assert_eq!(user.following, expected["following"].as_bool().unwrap(), "{name}: following");
    assert_eq!(user.follower_count, expected["follower_count"].as_u64().unwrap(), "{name}: follower_count");
    assert_eq!(user.following_count, expected["following_count"].as_u64().unwrap(), "{name}: following_count");
    assert_eq!(user.post_count, expected["post_count"].as_u64().unwrap(), "{name}: post_count");
}

#[test]
fn user_test_vectors() {
    let raw = include_str!("../../test-vectors/users.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let session = Session::new("t", "s");

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = serde_json::from_value::<UserData>(case["payload"].clone())
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
            .and_then(|data| User::from_data(&session, data));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "DeserializationError" => {
                    assert!(matches!(err, ApiError::DeserializationError(_)), "{name}: expected DeserializationError")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            assert_user(&result.unwrap(), &case["expected"], name);
        }
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Attach the shared author to a post payload and every post nested in it.
fn with_author(mut payload: Value, author: &Value) -> Value {
    payload["author"] = author.clone();
    for key in ["quoted_post", "replied_post"] {
        if let Some(nested) = payload.get(key).filter(|v| !v.is_null()).cloned() {
            payload[key] = with_author(nested, author);
        }
    }
    payload
}

fn assert_post(post: &Post<'_>, expected: &Value, name: &str) {
    assert_eq!(post.id, expected["id"].as_str().unwrap(), "{name}: id");
    assert_eq!(post.content, expected["content"].as_str().unwrap(), "{name}: content");
    assert_eq!(post.timestamp.to_rfc3339(), expected["timestamp"].as_str().unwrap(), "{name}: timestamp");
    assert_eq!(post.like_count, expected["like_count"].as_u64().unwrap(), "{name}: like_count");
    assert_eq!(post.liked, expected["liked"].as_bool().unwrap(), "{name}: liked");
    assert_eq!(post.reposted, expected["reposted"].as_bool().unwrap(), "{name}: reposted");
    let file_urls: Vec<String> = serde_json::from_value(expected["file_urls"].clone()).unwrap();
    assert_eq!(post.file_urls, file_urls, "{name}: file_urls");
    assert_eq!(post.share_url, expected["share_url"].as_str().unwrap(), "{name}: share_url");
    assert_eq!(post.author.attributes, vec!["bot"], "{name}: author attributes");

    for (nested, key) in [(&post.quoted_post, "quoted"), (&post.replied_post, "replied")] {
        match (nested.as_deref(), &expected[key]) {
            (None, Value::Null) => {}
            (Some(inner), exp) if !exp.is_null() => assert_post(inner, exp, &format!("{name} > {key}")),
            (got, exp) => panic!("{name}: {key} mismatch, got {:?}, expected {exp}", got.map(|p| &p.id)),
        }
    }
}

#[test]
fn post_test_vectors() {
    let raw = include_str!("../../test-vectors/posts.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let author = &vectors["author"];
    let session = Session::new("t", "s");

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let payload = with_author(case["payload"].clone(), author);
        let result = serde_json::from_value::<PostData>(payload)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
            .and_then(|data| Post::from_data(&session, data));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "DeserializationError" => {
                    assert!(matches!(err, ApiError::DeserializationError(_)), "{name}: expected DeserializationError")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            assert_post(&result.unwrap(), &case["expected"], name);
        }
    }
}
