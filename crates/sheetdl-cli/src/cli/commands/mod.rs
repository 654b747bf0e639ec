//! CLI command handlers, one file per command.

mod completions;
mod folder;
mod preview;
mod run;
mod template;

pub use completions::{run_completions, run_man};
pub use folder::run_folder;
pub use preview::run_preview;
pub use run::{resolve_target, run_download, RunOverrides};
pub use template::run_template;
