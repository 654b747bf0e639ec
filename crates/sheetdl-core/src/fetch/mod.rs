//! One blocking HTTP GET per row.
//!
//! Uses the curl crate (libcurl). The response body is handed to the caller's
//! writer in chunks as it arrives; nothing is buffered here.

mod auth;
mod error;
mod headers;

pub use auth::{CredentialScope, Credentials};
pub use error::{ErrorKind, FetchError};

use headers::DeclaredLength;
use std::cell::Cell;
use std::io::{self, Write};
use std::str;
use std::time::Duration;

/// Receive buffer size handed to libcurl; the writer sees chunks of at most this many bytes.
pub const CHUNK_SIZE: usize = 8192;

/// Default connect / read-stall timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a URL into a writer.
pub trait Fetch {
    /// GET `url`, writing the body to `out`. `progress` is called after each chunk with
    /// `(bytes received so far, declared Content-Length if any)`.
    /// Returns the number of bytes written.
    fn fetch(
        &self,
        url: &str,
        out: &mut dyn Write,
        progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<u64, FetchError>;
}

/// URL as sent on the wire: spaces and non-ASCII characters percent-encoded.
/// Text that does not parse as a URL is passed through for libcurl to reject.
fn request_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.as_str().to_string(),
        Err(_) => url.to_string(),
    }
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    timeout: Duration,
    credentials: Option<Credentials>,
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, None)
    }
}

impl CurlFetcher {
    pub fn new(timeout: Duration, credentials: Option<Credentials>) -> Self {
        Self {
            timeout,
            credentials,
        }
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(&request_url(url))?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Error statuses fail the transfer before any body byte reaches the writer.
        easy.fail_on_error(true)?;
        easy.buffer_size(CHUNK_SIZE)?;
        easy.connect_timeout(self.timeout)?;
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.timeout)?;

        if let Some((user, pass)) = self.credentials.as_ref().and_then(|c| c.for_url(url)) {
            let mut auth = curl::easy::Auth::new();
            auth.basic(true);
            easy.http_auth(&auth)?;
            easy.username(user)?;
            easy.password(pass)?;
            tracing::debug!(url, "attaching basic credentials");
        }
        Ok(())
    }
}

impl Fetch for CurlFetcher {
    fn fetch(
        &self,
        url: &str,
        out: &mut dyn Write,
        progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)?;

        let declared = Cell::new(DeclaredLength::default());
        let received = Cell::new(0u64);
        let mut write_error: Option<io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    let mut d = declared.get();
                    d.observe(line);
                    declared.set(d);
                }
                true
            })?;
            transfer.write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    let total = received.get() + data.len() as u64;
                    received.set(total);
                    progress(total, declared.get().get());
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_error {
            return Err(FetchError::Io(e));
        }
        if let Err(e) = performed {
            if e.is_http_returned_error() {
                let code = easy.response_code().unwrap_or(0);
                return Err(FetchError::Http {
                    code,
                    url: url.to_string(),
                });
            }
            return Err(FetchError::Transport(e));
        }

        let code = easy.response_code()?;
        if code >= 400 {
            return Err(FetchError::Http {
                code,
                url: url.to_string(),
            });
        }

        out.flush()?;
        Ok(received.get())
    }
}
