//! `sheetdl run` – download every URL listed in a workbook.

use anyhow::{Context, Result};
use sheetdl_core::batch::{run_batch, BatchOptions, BatchReport};
use sheetdl_core::config::{AuthConfig, SheetdlConfig, PASSWORD_ENV};
use sheetdl_core::fetch::CurlFetcher;
use sheetdl_core::naming::unix_now;
use sheetdl_core::sheet::{read_table, SheetSelector};
use sheetdl_core::sink::{Delivery, DirectorySink, LinksSink, Sink, ZipSink};
use std::fmt;
use std::path::PathBuf;

use crate::cli::folders::{human_bytes, pick_directory};
use crate::cli::progress::TerminalProgress;
use crate::cli::{Destination, SheetArgs};

/// Command-line values that override config.toml for one run.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub sheet: SheetArgs,
    pub delay: Option<f64>,
    pub timeout: Option<u64>,
    pub no_strict_names: bool,
    pub auth_user: Option<String>,
    pub auth_hosts: Vec<String>,
    pub auth_any_host: bool,
}

/// Resolved destination for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Directory(PathBuf),
    Links(PathBuf),
    Zip {
        archive: PathBuf,
        page: Option<PathBuf>,
    },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Directory(dir) => write!(f, "{}", dir.display()),
            Target::Links(page) => write!(f, "download links page {}", page.display()),
            Target::Zip { archive, page: None } => write!(f, "ZIP archive {}", archive.display()),
            Target::Zip {
                archive,
                page: Some(page),
            } => write!(
                f,
                "ZIP archive {} (link page {})",
                archive.display(),
                page.display()
            ),
        }
    }
}

impl Target {
    fn into_sink(self) -> Box<dyn Sink + Send> {
        match self {
            Target::Directory(dir) => Box::new(DirectorySink::new(dir)),
            Target::Links(page) => Box::new(LinksSink::new(page)),
            Target::Zip { archive, page } => Box::new(ZipSink::new(archive, page)),
        }
    }
}

/// Pick the destination from the flags; config `download_dir` when none is given.
pub fn resolve_target(
    cfg: &SheetdlConfig,
    dest: &Destination,
    zip_html: Option<PathBuf>,
) -> Result<Target> {
    if let Some(dir) = &dest.dir {
        return Ok(Target::Directory(dir.clone()));
    }
    if let Some(quick) = dest.quick {
        return Ok(Target::Directory(quick.path()?));
    }
    if dest.pick_dir {
        return Ok(Target::Directory(pick_directory()?));
    }
    if let Some(page) = &dest.links {
        return Ok(Target::Links(page.clone()));
    }
    if let Some(archive) = &dest.zip {
        return Ok(Target::Zip {
            archive: archive.clone(),
            page: zip_html,
        });
    }
    Ok(Target::Directory(cfg.download_dir.clone()))
}

fn overlay_auth(
    base: Option<AuthConfig>,
    user: Option<String>,
    hosts: Vec<String>,
    any_host: bool,
) -> Option<AuthConfig> {
    let mut auth = match (base, user) {
        (Some(mut auth), Some(username)) => {
            auth.username = username;
            auth
        }
        (None, Some(username)) => AuthConfig {
            username,
            ..AuthConfig::default()
        },
        (Some(auth), None) => auth,
        (None, None) => {
            if !hosts.is_empty() || any_host {
                tracing::warn!("auth host flags given without a username; ignoring");
            }
            return None;
        }
    };
    auth.hosts.extend(hosts);
    auth.allow_any_host |= any_host;
    Some(auth)
}

/// Config for this run: file values with command-line overrides applied.
fn effective_config(cfg: &SheetdlConfig, o: RunOverrides) -> Result<SheetdlConfig> {
    let mut cfg = cfg.clone();
    if let Some(sheet) = o.sheet.sheet {
        cfg.sheet = sheet;
    }
    if let Some(column) = o.sheet.url_column {
        cfg.url_column = column;
    }
    if let Some(column) = o.sheet.filename_column {
        cfg.filename_column = Some(column);
    }
    if let Some(delay) = o.delay {
        cfg.delay_secs = delay;
    }
    if let Some(timeout) = o.timeout {
        cfg.timeout_secs = timeout;
    }
    if o.no_strict_names {
        cfg.strict_filenames = false;
    }
    cfg.auth = overlay_auth(cfg.auth.take(), o.auth_user, o.auth_hosts, o.auth_any_host);
    cfg.validate()?;
    Ok(cfg)
}

pub async fn run_download(
    cfg: &SheetdlConfig,
    workbook: PathBuf,
    overrides: RunOverrides,
    target: Target,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let cfg = effective_config(cfg, overrides)?;
    let credentials = cfg
        .auth
        .as_ref()
        .map(|a| a.credentials(std::env::var(PASSWORD_ENV).ok()))
        .transpose()?;
    if let Some(creds) = &credentials {
        tracing::info!(scope = ?creds.scope(), "basic auth enabled");
    }

    let table = read_table(&workbook, &SheetSelector::parse(&cfg.sheet))?;
    let (n_rows, n_cols) = table.shape();
    println!(
        "Workbook: {}",
        workbook
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| workbook.display().to_string())
    );
    println!(
        "Sheet: {} ({} rows x {} columns)",
        table.sheet_name, n_rows, n_cols
    );
    let rows = table.extract_rows(&cfg.url_column, cfg.filename_column())?;
    println!("Download destination: {}", target);
    println!("Found {} valid URL(s) in column '{}'", rows.len(), cfg.url_column);
    if rows.is_empty() {
        println!("Nothing to download.");
        return Ok(());
    }

    let fetcher = CurlFetcher::new(cfg.timeout(), credentials);
    let options = BatchOptions {
        strict_filenames: cfg.strict_filenames,
        delay: cfg.delay(),
        clock: unix_now,
    };
    let mut sink = target.into_sink();
    let (report, delivery) = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut progress = TerminalProgress::new();
        let report = run_batch(&rows, sink.as_mut(), &fetcher, &options, &mut progress);
        progress.finish();
        let delivery = sink.finish().context("failed to finalize downloads")?;
        Ok((report, delivery))
    })
    .await??;

    print_summary(&report, &delivery);
    if let Some(path) = report_path {
        report.write_json(&path)?;
        println!("Download log written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &BatchReport, delivery: &Delivery) {
    println!();
    for line in summary_lines(report) {
        println!("{}", line);
    }
    println!("{}", delivery);
    println!();
    println!("{:<8} {:<32} {:>10} {}", "STATUS", "FILENAME", "SIZE", "URL / ERROR");
    for line in log_lines(report) {
        println!("{}", line);
    }
}

fn summary_lines(report: &BatchReport) -> Vec<String> {
    vec![
        format!("Successful downloads: {}", report.successful()),
        format!("Failed downloads:     {}", report.failed()),
        format!("Total processed:      {}", report.total()),
        format!("Total downloaded:     {}", human_bytes(report.bytes())),
    ]
}

fn log_lines(report: &BatchReport) -> Vec<String> {
    report
        .outcomes
        .iter()
        .map(|o| match (o.size(), o.error()) {
            (Some(size), _) => format!("{:<8} {:<32} {:>10} {}", "ok", o.filename, size, o.url),
            (None, error) => format!(
                "{:<8} {:<32} {:>10} {}",
                "failed",
                o.filename,
                "-",
                error.unwrap_or_default()
            ),
        })
        .collect()
}
