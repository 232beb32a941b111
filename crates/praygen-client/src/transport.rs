use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Design-default request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One outbound chat-completion call. The wire protocol is always
/// `POST` with a JSON body and a bearer credential.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub url: String,
    pub bearer_token: String,
    pub body: serde_json::Value,
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Failure below the HTTP status layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded the transport's deadline.
    TimedOut(String),
    /// Connection-level failure (reset, refused, DNS).
    Io(String),
}

/// Abstraction over the HTTP-calling capability. The client never opens
/// or manages connections itself; callers supply a transport, tests
/// supply a scripted fake.
pub trait HttpTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest transport with a per-client timeout.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self { client })
    }

    pub fn with_default_timeout() -> Result<Self> {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let resp = self
            .client
            .post(&req.url)
            .bearer_auth(&req.bearer_token)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&req.body)
            .send()
            .map_err(classify_reqwest_error)?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(classify_reqwest_error)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut(err.to_string())
    } else {
        TransportError::Io(err.to_string())
    }
}

/// Test transport that replays a scripted sequence of outcomes and records
/// every request it saw.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, err: TransportError) -> Self {
        self.push(Err(err));
        self
    }

    fn push(&self, outcome: Result<HttpResponse, TransportError>) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    /// Number of requests executed so far.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Copies of the requests executed so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req.clone());
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io("script exhausted".to_string())))
    }
}
