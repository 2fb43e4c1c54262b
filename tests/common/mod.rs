//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use redmine_api::clients::{HttpError, HttpRequest, HttpResponse, HttpTransport};
use redmine_api::wire::{WireMap, WireValue};
use redmine_api::RedmineClient;

/// A transport that records requests and replays queued responses.
///
/// Once the queue is empty every request fails with a transport error, so a
/// test notices requests it did not expect.
#[derive(Debug, Default)]
pub struct FakeTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response.
    pub fn json(self, code: u16, body: impl Into<String>) -> Self {
        self.respond(code, "application/json; charset=utf-8", body)
    }

    /// Queues an XML response.
    pub fn xml(self, code: u16, body: impl Into<String>) -> Self {
        self.respond(code, "application/xml; charset=utf-8", body)
    }

    /// Queues a response with the given content type.
    pub fn respond(self, code: u16, content_type: &str, body: impl Into<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), vec![content_type.to_string()]);
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(code, headers, body)));
        self
    }

    /// Queues a transport failure.
    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Returns the recorded requests, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the recorded request paths, oldest first.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Returns `"METHOD path"` for every recorded request, oldest first.
    pub fn calls_summary(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.http_method.to_string().to_uppercase(), r.path))
            .collect()
    }
}

impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(HttpError::transport(message)),
            None => Err(HttpError::transport(format!("unexpected request to {path}"))),
        }
    }
}

/// Creates a client over `transport`.
pub fn client(transport: FakeTransport) -> RedmineClient<FakeTransport> {
    RedmineClient::with_transport(transport)
}

/// Converts a JSON object literal into request parameters.
pub fn params(value: serde_json::Value) -> WireMap {
    match WireValue::from(value) {
        WireValue::Map(map) => map,
        other => panic!("expected an object, got {other:?}"),
    }
}

/// Builds one page of an issue listing.
pub fn issue_page(ids: std::ops::Range<i64>, offset: i64, limit: i64, total: i64) -> String {
    let issues: Vec<serde_json::Value> = ids
        .map(|id| serde_json::json!({"id": id, "subject": format!("Issue {id}")}))
        .collect();
    serde_json::json!({
        "issues": issues,
        "total_count": total,
        "offset": offset,
        "limit": limit,
    })
    .to_string()
}
