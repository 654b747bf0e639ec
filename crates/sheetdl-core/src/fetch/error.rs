//! Per-row fetch error, split into the two tiers reported to the user.

use std::io;
use thiserror::Error;

/// Which tier an error belongs to in the download log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failures and HTTP error statuses.
    Network,
    /// Everything else (bad target path, disk full, ...).
    Other,
}

/// Error returned by a single row's fetch attempt. Never fatal to a run.
///
/// `Display` renders the message shown in the download log.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Transport(#[from] curl::Error),
    /// Server answered with an error status.
    #[error("Network error: HTTP {code} for url: {url}")]
    Http { code: u32, url: String },
    /// Writing the received bytes failed.
    #[error("Error: {0}")]
    Io(#[from] io::Error),
    /// Any other failure while preparing or storing the download.
    #[error("Error: {0}")]
    Other(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport(_) | FetchError::Http { .. } => ErrorKind::Network,
            FetchError::Io(_) | FetchError::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_network_tier() {
        let e = FetchError::Http {
            code: 404,
            url: "https://example.com/a.pdf".to_string(),
        };
        assert_eq!(e.kind(), ErrorKind::Network);
        assert_eq!(
            e.to_string(),
            "Network error: HTTP 404 for url: https://example.com/a.pdf"
        );
    }

    #[test]
    fn io_is_other_tier() {
        let e = FetchError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(e.kind(), ErrorKind::Other);
        assert_eq!(e.to_string(), "Error: denied");
    }

    #[test]
    fn other_message() {
        let e = FetchError::Other("bad target".to_string());
        assert_eq!(e.kind(), ErrorKind::Other);
        assert_eq!(e.to_string(), "Error: bad target");
    }
}
