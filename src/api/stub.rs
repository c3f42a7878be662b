use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use serde_json::Value;

use super::{ApiError, ApiRequest, FormData, RawResponse, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: Vec<u8> },
    Fail,
}

/// Replies are keyed by `"METHOD /path"`. Several replies for one key are
/// served in order, the last one repeating. Unknown keys fail like a refused
/// connection.
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, key: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn reply(self, key: &str, status: u16, body: Value) -> Self {
        let body = serde_json::to_vec(&body).unwrap();
        self.push(key, Reply::Respond { status, body })
    }

    pub fn reply_raw(self, key: &str, status: u16, body: &str) -> Self {
        let body = body.as_bytes().to_vec();
        self.push(key, Reply::Respond { status, body })
    }

    pub fn fail(self, key: &str) -> Self {
        self.push(key, Reply::Fail)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn last_form(&self) -> Option<FormData> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|r| r.form.clone())
    }

    fn next_reply(&self, key: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let key = format!("{} {}", request.method, request.path);
        self.requests.lock().unwrap().push(request);
        match self.next_reply(&key) {
            Some(Reply::Respond { status, body }) => Ok(RawResponse { status, body }),
            Some(Reply::Fail) | None => Err(ApiError::Network(format!("no route for {}", key))),
        }
    }
}
