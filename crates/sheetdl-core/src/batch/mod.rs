//! The sequential download run: rows in, outcomes out.

mod observer;
mod outcome;
mod run;

pub use observer::{progress_fraction, BatchObserver, NoopObserver};
pub use outcome::{BatchReport, Outcome, OutcomeStatus};
pub use run::{run_batch, BatchOptions};
