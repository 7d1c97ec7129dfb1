//! Scripted HTTP client for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::client::http::{HttpClient, HttpRequest, HttpResponse};
use crate::transport::TokenSource;
use crate::{ClientError, ClientResult};

enum Scripted {
    Ready(ClientResult<HttpResponse>),
    Gated(oneshot::Receiver<()>, ClientResult<HttpResponse>),
}

#[derive(Default)]
struct MockState {
    replies: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// Replays queued replies in order and records every request it sees
#[derive(Clone, Default)]
pub(crate) struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, reply: Scripted) {
        self.state.lock().unwrap().replies.push_back(reply);
    }

    pub(crate) fn reply_json(&self, status: StatusCode, body: Value) {
        self.reply_raw(status, serde_json::to_vec(&body).unwrap());
    }

    pub(crate) fn reply_raw(&self, status: StatusCode, body: Vec<u8>) {
        self.push(Scripted::Ready(Ok(HttpResponse::new(status, body))));
    }

    pub(crate) fn reply_network_error(&self, message: &str) {
        self.push(Scripted::Ready(Err(ClientError::Network(message.into()))));
    }

    /// Queue a reply that is held back until the returned sender fires
    pub(crate) fn reply_gated(&self, status: StatusCode, body: Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        let response = HttpResponse::new(status, serde_json::to_vec(&body).unwrap());
        self.push(Scripted::Gated(rx, Ok(response)));
        tx
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let scripted = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            state.replies.pop_front()
        };
        match scripted {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(gate, reply)) => {
                let _ = gate.await;
                reply
            }
            None => Err(ClientError::Network("no scripted reply".into())),
        }
    }
}

/// Fixed bearer token
pub(crate) struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
