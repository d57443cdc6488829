//! Scripted in-memory [`HttpClient`] for end-to-end extraction tests.
//!
//! Each route is a (method, URL) pair with a queue of replies. The last reply
//! of a queue repeats. Every request is logged so tests can count exchanges.

use anyhow::{anyhow, Result};
use dbx_core::http::{HttpClient, HttpRequest, HttpResponse, Method};
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub enum Reply {
    Ok { status: u32, body: Vec<u8> },
    Fail(String),
}

impl Reply {
    pub fn html(body: &str) -> Self {
        Reply::Ok {
            status: 200,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Reply::Ok {
            status: 200,
            body: value.to_string().into_bytes(),
        }
    }

    pub fn status(status: u32) -> Self {
        Reply::Ok {
            status,
            body: Vec::new(),
        }
    }
}

struct Route {
    method: Method,
    url: String,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
pub struct ScriptedHttp {
    routes: RefCell<Vec<Route>>,
    log: RefCell<Vec<HttpRequest>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, method: Method, url: &str, replies: Vec<Reply>) -> Self {
        self.routes.borrow_mut().push(Route {
            method,
            url: url.to_string(),
            replies: replies.into(),
        });
        self
    }

    pub fn get(self, url: &str, reply: Reply) -> Self {
        self.route(Method::Get, url, vec![reply])
    }

    pub fn post(self, url: &str, reply: Reply) -> Self {
        self.route(Method::Post, url, vec![reply])
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.borrow().clone()
    }

    /// Number of logged requests with this method and URL.
    pub fn count(&self, method: Method, url: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

impl HttpClient for ScriptedHttp {
    fn send(&self, req: &HttpRequest) -> Result<HttpResponse> {
        self.log.borrow_mut().push(req.clone());

        let mut routes = self.routes.borrow_mut();
        let route = routes
            .iter_mut()
            .find(|r| r.method == req.method && r.url == req.url)
            .ok_or_else(|| anyhow!("no scripted route for {} {}", req.method, req.url))?;
        let reply = if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        }
        .ok_or_else(|| anyhow!("route {} {} has no replies", req.method, req.url))?;

        match reply {
            Reply::Ok { status, body } => Ok(HttpResponse {
                status,
                url: req.url.clone(),
                headers: Vec::new(),
                body,
            }),
            Reply::Fail(msg) => Err(anyhow!(msg)),
        }
    }
}
