//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies by path and 404 for anything else. When credentials are
//! configured, requests without the matching Basic `Authorization` header get 401.
//! Every request's Authorization header (if any) is recorded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    Body(Vec<u8>),
    /// Declares `declared` bytes, sends `body`, then closes.
    Truncated { body: Vec<u8>, declared: u64 },
    Status(u16),
}

#[derive(Debug, Default, Clone)]
pub struct ServerOptions {
    /// `(user, password)` required on every request.
    pub basic_auth: Option<(String, String)>,
}

pub struct FileServer {
    pub base: String,
    seen_auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl FileServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Decoded `user:password` of each request, in arrival order (`None` = no header).
    pub fn seen_auth(&self) -> Vec<Option<String>> {
        self.seen_auth.lock().unwrap().clone()
    }
}

pub fn start(routes: Vec<(&str, Route)>) -> FileServer {
    start_with_options(routes, ServerOptions::default())
}

/// Starts the server on a background thread; it runs until the process exits.
pub fn start_with_options(routes: Vec<(&str, Route)>, opts: ServerOptions) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (format!("/{}", p.trim_start_matches('/')), r))
            .collect(),
    );
    let opts = Arc::new(opts);
    let seen_auth = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&seen_auth);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let opts = Arc::clone(&opts);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &opts, &seen));
        }
    });
    FileServer {
        base: format!("http://127.0.0.1:{}/", port),
        seen_auth,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Route>,
    opts: &ServerOptions,
    seen: &Mutex<Vec<Option<String>>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (path, auth) = parse_request(request);
    seen.lock().unwrap().push(auth.clone());

    if let Some((user, pass)) = &opts.basic_auth {
        if auth.as_deref() != Some(format!("{user}:{pass}").as_str()) {
            let _ = stream.write_all(
                b"HTTP/1.1 401 Unauthorized\r\nWWW-Authenticate: Basic realm=\"files\"\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
            return;
        }
    }

    match routes.get(&path) {
        Some(Route::Body(body)) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Route::Truncated { body, declared }) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                declared
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Route::Status(code)) => {
            let head = format!(
                "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            );
            let _ = stream.write_all(head.as_bytes());
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}

/// Returns (path without query, decoded Basic credentials if present).
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut lines = request.lines();
    let path = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = path.split(['?', '#']).next().unwrap_or("/").to_string();
    let mut auth = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                let value = value.trim();
                if let Some(encoded) = value.strip_prefix("Basic ") {
                    auth = STANDARD
                        .decode(encoded.trim())
                        .ok()
                        .and_then(|b| String::from_utf8(b).ok());
                }
            }
        }
    }
    (path, auth)
}
