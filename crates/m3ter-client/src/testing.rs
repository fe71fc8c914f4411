//! In-memory [`Transport`] for tests.
//!
//! Replies are queued per `(method, url)` and consumed in order; an
//! unexpected request gets a 404. Every request is recorded.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};

enum Reply {
    Response(ApiResponse),
    Fail(String),
}

/// Scripted transport.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: &Method, url: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry((method.to_string(), url.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Queue a JSON reply.
    pub fn reply(&self, method: &Method, url: &str, status: u16, body: &serde_json::Value) {
        self.push(
            method,
            url,
            Reply::Response(ApiResponse::new(status, body.to_string())),
        );
    }

    /// Queue a raw text reply.
    pub fn reply_raw(&self, method: &Method, url: &str, status: u16, body: &str) {
        self.push(method, url, Reply::Response(ApiResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn fail(&self, method: &Method, url: &str, message: &str) {
        self.push(method, url, Reply::Fail(message.to_string()));
    }

    /// Every request executed so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of requests whose URL starts with `prefix`.
    #[must_use]
    pub fn count(&self, method: &Method, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == *method && r.url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let key = (request.method.to_string(), request.url.clone());
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(ClientError::Transport(message)),
            None => Ok(ApiResponse::new(404, r#"{"message":"no fake reply queued"}"#)),
        }
    }
}
