//! The seam between the session and the real HTTP client.
//!
//! # Design
//! A `Connector` is asked for exactly one `Connection` per `Session::open`,
//! and that connection is shut down exactly once per `Session::close`.
//! The default pair wraps `reqwest`; tests substitute a recording fake.
//! Pooling, TLS and connect errors are entirely the connection's business.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE};
use reqwest::multipart;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::Credentials;

/// Creates live connections bound to a set of credentials.
pub trait Connector: Send + Sync {
    fn connect(&self, credentials: &Credentials, user_agent: &str) -> Result<Box<dyn Connection>, ApiError>;
}

/// A live connection that can carry many concurrent requests.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute one HTTP exchange. Statuses >= 400 are returned as data, not errors.
    async fn send(&self, url: &str, request: &HttpRequest) -> Result<HttpResponse, ApiError>;

    /// Tear the connection down.
    async fn shutdown(self: Box<Self>);
}

/// Builds `reqwest` clients with the auth header and session cookie attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestConnector;

impl Connector for ReqwestConnector {
    fn connect(&self, credentials: &Credentials, user_agent: &str) -> Result<Box<dyn Connection>, ApiError> {
        Ok(Box::new(ReqwestConnection::new(credentials, user_agent)?))
    }
}

#[derive(Debug)]
pub struct ReqwestConnection {
    client: reqwest::Client,
}

impl ReqwestConnection {
    pub fn new(credentials: &Credentials, user_agent: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, sensitive_header(credentials.token())?);
        headers.insert(
            COOKIE,
            sensitive_header(&format!("session={}", credentials.session()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue, ApiError> {
    let mut header =
        HeaderValue::from_str(value).map_err(|e| ApiError::InvalidCredentials(e.to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_form(request: &HttpRequest) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new();
    for (key, value) in &request.form {
        form = form.text(key.clone(), value.clone());
    }
    for (field, file) in &request.files {
        let mut part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ApiError::Transport(e.to_string()))?;
        }
        form = form.part(field.clone(), part);
    }
    Ok(form)
}

#[async_trait]
impl Connection for ReqwestConnection {
    async fn send(&self, url: &str, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.client.request(reqwest_method(request.method), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.files.is_empty() {
            builder = builder.multipart(multipart_form(request)?);
        } else if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn shutdown(self: Box<Self>) {
        // Dropping the last client handle closes its pooled connections.
        drop(self.client);
    }
}
