//! In-memory transport for the resource unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::rest::RedmineClient;

/// Records every request and answers from a queue.
///
/// An exhausted queue answers `200` with an empty JSON body.
#[derive(Debug, Default)]
pub struct FakeTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, code: u16, content_type: &str, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), vec![content_type.to_string()]);
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(code, headers, body));
        self
    }

    pub fn json(self, code: u16, body: &str) -> Self {
        self.respond(code, "application/json", body)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.requests()
            .into_iter()
            .map(|request| (request.http_method, request.path))
            .collect()
    }

    pub fn last_body(&self) -> String {
        self.requests()
            .last()
            .and_then(HttpRequest::body_text)
            .unwrap_or_default()
    }
}

impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| {
            let mut headers = HashMap::new();
            headers.insert("content-type".to_string(), vec!["application/json".to_string()]);
            HttpResponse::new(200, headers, "")
        }))
    }
}

pub fn client(transport: FakeTransport) -> RedmineClient<FakeTransport> {
    RedmineClient::with_transport(transport)
}

pub fn params(value: serde_json::Value) -> crate::wire::WireMap {
    match crate::wire::WireValue::from(value) {
        crate::wire::WireValue::Map(map) => map,
        other => panic!("expected map, got {other:?}"),
    }
}
