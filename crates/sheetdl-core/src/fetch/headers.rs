//! Response header tracking for progress reporting.

/// Tracks the declared `Content-Length` of the final response.
///
/// Each status line (`HTTP/...`) starts a new header block, so lengths from
/// redirect responses are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DeclaredLength(Option<u64>);

impl DeclaredLength {
    pub(crate) fn observe(&mut self, line: &str) {
        let line = line.trim();
        if line.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("HTTP/")) {
            self.0 = None;
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.0 = value.trim().parse::<u64>().ok().filter(|n| *n > 0);
            }
        }
    }

    pub(crate) fn get(&self) -> Option<u64> {
        self.0
    }
}
