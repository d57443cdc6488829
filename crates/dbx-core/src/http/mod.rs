//! HTTP transport seam.
//!
//! Extraction code only talks to [`HttpClient`]; [`CurlClient`] is the
//! production implementation (libcurl via the curl crate) and keeps its own
//! cookie jar.

mod client;
mod parse;

pub use client::CurlClient;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::Get,
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn post(url: &str, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url: url.to_string(),
            headers: HashMap::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    /// Final URL after redirects.
    pub url: String,
    /// Header lines of the final response, in order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as UTF-8; invalid sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can perform a single request/response exchange.
pub trait HttpClient {
    fn send(&self, req: &HttpRequest) -> Result<HttpResponse>;
}

impl dyn HttpClient + '_ {
    /// Sends `req` and fails on a non-2xx status.
    pub fn fetch(&self, req: &HttpRequest) -> Result<HttpResponse> {
        let resp = self
            .send(req)
            .with_context(|| format!("{} {} failed", req.method, req.url))?;
        if !resp.is_success() {
            anyhow::bail!("{} {} returned HTTP {}", req.method, req.url, resp.status);
        }
        Ok(resp)
    }

    /// Plain GET of a page, returned as text.
    pub fn get_text(&self, url: &str) -> Result<String> {
        Ok(self.fetch(&HttpRequest::get(url))?.text())
    }
}
