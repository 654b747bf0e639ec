//! CLI for sheetdl.

mod commands;
mod folders;
mod progress;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sheetdl_core::config::{self, SheetdlConfig};
use std::path::PathBuf;

pub use folders::QuickFolder;

use commands::{
    resolve_target, run_completions, run_download, run_folder, run_man, run_preview,
    run_template, RunOverrides,
};

/// Top-level CLI for sheetdl.
#[derive(Debug, Parser)]
#[command(name = "sheetdl")]
#[command(about = "sheetdl: download every URL listed in a spreadsheet", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Which sheet and columns to read. Unset values come from config.toml.
#[derive(Debug, Clone, Default, Args)]
pub struct SheetArgs {
    /// Sheet index (0 = first) or sheet name.
    #[arg(long)]
    pub sheet: Option<String>,
    /// Header of the column holding the URLs.
    #[arg(long, value_name = "NAME")]
    pub url_column: Option<String>,
    /// Header of the column holding custom filenames.
    #[arg(long, value_name = "NAME")]
    pub filename_column: Option<String>,
}

/// Where downloaded files go. At most one; defaults to `download_dir` from config.
#[derive(Debug, Clone, Default, Args)]
#[group(id = "destination", multiple = false)]
pub struct Destination {
    /// Save files into this directory.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
    /// Save files into a well-known folder.
    #[arg(long, value_enum, value_name = "FOLDER")]
    pub quick: Option<QuickFolder>,
    /// Choose the target directory with a native folder picker.
    #[arg(long)]
    pub pick_dir: bool,
    /// Keep files in memory and write an HTML page of download links.
    #[arg(long, value_name = "HTML")]
    pub links: Option<PathBuf>,
    /// Keep files in memory and write them into one ZIP archive.
    #[arg(long, value_name = "ZIP")]
    pub zip: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every URL in a workbook.
    Run {
        /// Spreadsheet file (xlsx, xlsm, xls, xlsb, ods).
        workbook: PathBuf,
        #[command(flatten)]
        sheet: SheetArgs,
        /// Seconds to wait between rows.
        #[arg(long, value_name = "SECS")]
        delay: Option<f64>,
        /// Connect and read-stall timeout per request, in seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Keep filenames as given instead of stripping special characters.
        #[arg(long)]
        no_strict_names: bool,
        #[command(flatten)]
        destination: Destination,
        /// With --zip: also write an HTML page linking to the archive.
        #[arg(long, value_name = "HTML", requires = "zip")]
        zip_html: Option<PathBuf>,
        /// Write the download log as JSON.
        #[arg(long, value_name = "JSON")]
        report: Option<PathBuf>,
        /// Basic auth username (password from SHEETDL_AUTH_PASSWORD or config).
        #[arg(long, value_name = "USER")]
        auth_user: Option<String>,
        /// Host allowed to receive credentials (repeatable).
        #[arg(long = "auth-host", value_name = "HOST")]
        auth_hosts: Vec<String>,
        /// Send credentials to every host in the workbook.
        #[arg(long)]
        auth_any_host: bool,
    },

    /// Show the shape, columns and first rows of a workbook.
    Preview {
        workbook: PathBuf,
        #[command(flatten)]
        sheet: SheetArgs,
        /// Number of rows to show.
        #[arg(long, default_value = "5", value_name = "N")]
        rows: usize,
    },

    /// Show whether a download folder exists and how much it holds.
    Folder {
        /// Folder to inspect (defaults to download_dir from config).
        #[arg(conflicts_with = "quick")]
        dir: Option<PathBuf>,
        #[arg(long, value_enum, value_name = "FOLDER")]
        quick: Option<QuickFolder>,
    },

    /// Write an example workbook in the expected format.
    Template {
        /// Output path (.xlsx).
        #[arg(default_value = "sheetdl_template.xlsx")]
        path: PathBuf,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                workbook,
                sheet,
                delay,
                timeout,
                no_strict_names,
                destination,
                zip_html,
                report,
                auth_user,
                auth_hosts,
                auth_any_host,
            } => {
                let cfg = load_config()?;
                let overrides = RunOverrides {
                    sheet,
                    delay,
                    timeout,
                    no_strict_names,
                    auth_user,
                    auth_hosts,
                    auth_any_host,
                };
                let target = resolve_target(&cfg, &destination, zip_html)?;
                run_download(&cfg, workbook, overrides, target, report).await?;
            }
            CliCommand::Preview {
                workbook,
                sheet,
                rows,
            } => run_preview(&load_config()?, &workbook, &sheet, rows)?,
            CliCommand::Folder { dir, quick } => run_folder(&load_config()?, dir, quick)?,
            CliCommand::Template { path } => run_template(&path)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

fn load_config() -> Result<SheetdlConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
