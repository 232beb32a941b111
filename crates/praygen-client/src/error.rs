use std::fmt;

/// Suggestion client failure taxonomy.
///
/// Transient kinds ([`Timeout`](ClientError::Timeout),
/// [`ServerError`](ClientError::ServerError),
/// [`RateLimited`](ClientError::RateLimited)) are retried by the dispatch
/// loop; everything else surfaces immediately. Messages never carry
/// credentials, so they are safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The journal text was empty after trimming. No network call was made.
    InvalidInput(String),
    /// The request exceeded its deadline.
    Timeout(String),
    /// The upstream rejected the credentials (401/403).
    Unauthorized(String),
    /// The upstream throttled the request (429).
    RateLimited(String),
    /// The upstream or the connection failed (5xx, reset, refused).
    ServerError(String),
    /// A 2xx response did not contain a usable suggestion, or the exchange
    /// violated the wire contract.
    MalformedResponse(String),
    /// The caller cancelled the call at a backoff boundary.
    Cancelled,
}

impl ClientError {
    /// Whether the dispatch loop should retry after this failure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::ServerError(_) | ClientError::RateLimited(_)
        )
    }

    fn kind(&self) -> &'static str {
        match self {
            ClientError::InvalidInput(_) => "invalid_input",
            ClientError::Timeout(_) => "timeout",
            ClientError::Unauthorized(_) => "unauthorized",
            ClientError::RateLimited(_) => "rate_limited",
            ClientError::ServerError(_) => "server_error",
            ClientError::MalformedResponse(_) => "malformed_response",
            ClientError::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidInput(msg)
            | ClientError::Timeout(msg)
            | ClientError::Unauthorized(msg)
            | ClientError::RateLimited(msg)
            | ClientError::ServerError(msg)
            | ClientError::MalformedResponse(msg) => {
                write!(f, "[{}] {}", self.kind(), msg)
            }
            ClientError::Cancelled => write!(f, "[cancelled] call cancelled by caller"),
        }
    }
}

impl std::error::Error for ClientError {}
