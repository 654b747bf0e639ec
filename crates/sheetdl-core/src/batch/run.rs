use std::io::Write;
use std::thread;
use std::time::Duration;

use super::{BatchObserver, BatchReport, Outcome, OutcomeStatus};
use crate::checksum::HashingWriter;
use crate::fetch::{Fetch, FetchError};
use crate::naming::{resolve_filename, unix_now};
use crate::sheet::RowRecord;
use crate::sink::Sink;

/// Knobs for one run.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub strict_filenames: bool,
    /// Pause between consecutive rows; not applied after the last row.
    pub delay: Duration,
    /// Clock used for fallback filenames.
    pub clock: fn() -> u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            strict_filenames: true,
            delay: Duration::from_secs(1),
            clock: unix_now,
        }
    }
}

/// Fetch every row into `sink`, one at a time.
///
/// Per-row failures are recorded and never stop the run. The sink is not
/// finished here; call [`Sink::finish`] afterwards.
pub fn run_batch(
    rows: &[RowRecord],
    sink: &mut dyn Sink,
    fetcher: &dyn Fetch,
    options: &BatchOptions,
    observer: &mut dyn BatchObserver,
) -> BatchReport {
    let total = rows.len();
    observer.batch_started(total);
    tracing::info!(rows = total, "batch started");

    let mut report = BatchReport {
        outcomes: Vec::with_capacity(total),
    };
    for (position, row) in rows.iter().enumerate() {
        let filename = resolve_filename(
            &row.url,
            row.filename.as_deref(),
            options.strict_filenames,
            (options.clock)(),
        );
        observer.row_started(position, total, &row.url, &filename);
        tracing::debug!(row = position + 1, url = %row.url, filename = %filename, "fetching");

        let outcome = fetch_row(&row.url, &filename, sink, fetcher, observer);
        match (&outcome.status, outcome.error_kind) {
            (OutcomeStatus::Success { size, .. }, _) => {
                tracing::info!(row = position + 1, url = %row.url, filename = %filename, size, "downloaded");
            }
            (OutcomeStatus::Failed { error }, kind) => {
                tracing::warn!(row = position + 1, url = %row.url, ?kind, "{error}");
            }
        }
        observer.row_finished(position, &outcome);
        report.outcomes.push(outcome);

        if position + 1 < total && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }
    }

    tracing::info!(
        successful = report.successful(),
        failed = report.failed(),
        total = report.total(),
        "batch finished"
    );
    report
}

fn fetch_row(
    url: &str,
    filename: &str,
    sink: &mut dyn Sink,
    fetcher: &dyn Fetch,
    observer: &mut dyn BatchObserver,
) -> Outcome {
    let mut digest: Option<String> = None;
    let stored = {
        let mut fill = |out: &mut dyn Write| -> Result<u64, FetchError> {
            let mut hashing = HashingWriter::new(out);
            let written = fetcher.fetch(url, &mut hashing, &mut |received, declared| {
                observer.bytes_received(received, declared)
            })?;
            let (hex, _) = hashing.finish();
            digest = Some(hex);
            Ok(written)
        };
        sink.store(filename, &mut fill)
    };
    match stored {
        Ok(size) => Outcome::success(url, filename, size, digest.unwrap_or_default()),
        Err(e) => Outcome::failed(url, filename, e.kind(), e.to_string()),
    }
}
