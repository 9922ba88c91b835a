//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use http::StatusCode;
use serde_json::{Value, json};

use crate::constants::ACCESS_TOKEN_PATH;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Records every request and answers from canned responses.
///
/// Token exchanges are answered by the token responder when one is set,
/// every other request pops the next queued response.
#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    queue: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    token: Mutex<Option<HttpResponse>>,
    token_delay: Option<Duration>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers token exchanges with `access_token`, valid for an hour.
    pub(crate) fn with_token(self, access_token: &str) -> Self {
        self.set_token_response(HttpResponse::json(
            StatusCode::OK,
            &json!({
                "token_type": "Bearer",
                "expires_in": "3600",
                "access_token": access_token,
            }),
        ));
        self
    }

    pub(crate) const fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = Some(delay);
        self
    }

    pub(crate) fn set_token_response(&self, response: HttpResponse) {
        *self.token.lock().unwrap() = Some(response);
    }

    pub(crate) fn push_json(&self, status: StatusCode, body: &Value) {
        self.push(Ok(HttpResponse::json(status, body)));
    }

    pub(crate) fn push(&self, response: Result<HttpResponse, TransportError>) {
        self.queue.lock().unwrap().push_back(response);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path == path)
            .count()
    }

    /// Last request that was not a token exchange.
    pub(crate) fn last_api_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|request| request.path != ACCESS_TOKEN_PATH)
            .cloned()
            .unwrap()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let is_token = request.path == ACCESS_TOKEN_PATH;
        self.requests.lock().unwrap().push(request);

        if is_token {
            let token = self.token.lock().unwrap().clone();
            if let Some(response) = token {
                if let Some(delay) = self.token_delay {
                    tokio::time::sleep(delay).await;
                }
                return Ok(response);
            }
        }

        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(StatusCode::NOT_FOUND, "no canned response")))
    }
}
