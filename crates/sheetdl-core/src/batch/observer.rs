//! Hooks for rendering progress while a batch runs.

use super::Outcome;

/// Receives progress events from [`super::run_batch`]. All methods default to no-ops.
pub trait BatchObserver {
    fn batch_started(&mut self, _total: usize) {}

    /// `position` is zero-based.
    fn row_started(&mut self, _position: usize, _total: usize, _url: &str, _filename: &str) {}

    /// Bytes received so far for the current row and the declared length, if any.
    fn bytes_received(&mut self, _received: u64, _declared: Option<u64>) {}

    fn row_finished(&mut self, _position: usize, _outcome: &Outcome) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Fraction of the current file received, when the server declared a length.
pub fn progress_fraction(received: u64, declared: Option<u64>) -> Option<f64> {
    match declared {
        Some(total) if total > 0 => Some((received as f64 / total as f64).min(1.0)),
        _ => None,
    }
}
