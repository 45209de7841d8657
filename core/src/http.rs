//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The client
//! builds `HttpRequest` values and interprets `HttpResponse` values; a
//! `Transport` implementation performs the actual network round trip. All
//! fields use owned types so values can be recorded and compared in tests.

use url::form_urlencoded;

/// HTTP method for a request. The MERMAID API surface used here is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// Query payload attached to a request.
///
/// The service accepts both keyed filters (`?size_min=20`) and bare flags
/// (`?showall`), so a flag is kept distinct from a pair with an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Valueless flag, rendered as `?key`.
    Flag(String),
    /// Single key/value filter, rendered as `?key=value`.
    Pair(String, String),
}

impl Query {
    pub fn flag(key: impl Into<String>) -> Self {
        Query::Flag(key.into())
    }

    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Pair(key.into(), value.into())
    }

    /// Render as a form-urlencoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        match self {
            Query::Flag(key) => form_urlencoded::byte_serialize(key.as_bytes()).collect(),
            Query::Pair(key, value) => form_urlencoded::Serializer::new(String::new())
                .append_pair(key, value)
                .finish(),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ApiClient::fetch`. `url` holds the base URL joined with the
/// normalized resource path; the query is kept separate so callers and tests
/// can inspect it without reparsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Option<Query>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// The URL including its rendered query string, ready to put on the wire.
    pub fn full_url(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.url, query.to_query_string()),
            None => self.url.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data, produced by a `Transport`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
