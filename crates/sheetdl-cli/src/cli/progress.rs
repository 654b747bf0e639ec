//! Terminal progress for `sheetdl run`.

use indicatif::{ProgressBar, ProgressStyle};
use sheetdl_core::batch::{progress_fraction, BatchObserver, Outcome};

const ROW_TEMPLATE: &str = "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";

/// One bar for the whole run: its length is the row count and the message
/// tracks the file currently being fetched.
pub struct TerminalProgress {
    bar: ProgressBar,
    filename: String,
    received: u64,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(ROW_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Self {
            bar,
            filename: String::new(),
            received: 0,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn transfer_message(filename: &str, received: u64, declared: Option<u64>) -> String {
    match (declared, progress_fraction(received, declared)) {
        (Some(total), Some(fraction)) => format!(
            "{filename}: {received}/{total} bytes ({:.0}%)",
            fraction * 100.0
        ),
        _ => format!("{filename}: {received} bytes"),
    }
}

impl BatchObserver for TerminalProgress {
    fn batch_started(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn row_started(&mut self, position: usize, _total: usize, _url: &str, filename: &str) {
        self.filename = filename.to_string();
        self.received = 0;
        self.bar.set_position(position as u64);
        self.bar.set_message(format!("Downloading {filename}"));
    }

    fn bytes_received(&mut self, received: u64, declared: Option<u64>) {
        self.received = received;
        self.bar
            .set_message(transfer_message(&self.filename, received, declared));
    }

    fn row_finished(&mut self, position: usize, outcome: &Outcome) {
        self.bar.set_position(position as u64 + 1);
        let line = match outcome.error() {
            None => format!("ok      {} ({} bytes)", outcome.filename, self.received),
            Some(err) => format!("failed  {}: {}", outcome.filename, err),
        };
        self.bar.println(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_with_and_without_length() {
        assert_eq!(
            transfer_message("a.pdf", 5, Some(10)),
            "a.pdf: 5/10 bytes (50%)"
        );
        assert_eq!(transfer_message("a.pdf", 5, None), "a.pdf: 5 bytes");
    }
}
