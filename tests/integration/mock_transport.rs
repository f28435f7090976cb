//! Recording transport for integration testing.
//!
//! Captures every request the client sends and replies from a scripted
//! queue, with no network access.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use grok_client::transport::{HttpResponse, OutgoingRequest, Transport};
use grok_client::GrokError;

/// A scripted reply: either an HTTP response or a transport failure.
pub enum Reply {
    Http(HttpResponse),
    Fail(String),
}

/// Cloneable handle; clones share the same request log and reply queue.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<OutgoingRequest>>>,
    replies: Arc<Mutex<VecDeque<Reply>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response whose first choice says `content`.
    pub fn answer(self, content: &str) -> Self {
        self.respond(
            200,
            json!({
                "id": "cmpl-test",
                "model": "grok-4-latest",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
            }),
        )
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Http(HttpResponse {
            status,
            body: body.to_string(),
            retry_after: None,
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(message.to_string()));
        self
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<OutgoingRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> OutgoingRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<HttpResponse, GrokError> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Http(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(GrokError::Network(message)),
            None => Err(GrokError::Network("no scripted reply left".into())),
        }
    }
}
