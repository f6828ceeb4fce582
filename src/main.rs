//! rotguard - detect silent file corruption using checksums stored in
//! extended attributes.
//!
//! Usage:
//!   rotguard FILE...              Verify files, tagging untagged ones
//!   rotguard -n FILE...           Verify without writing any attributes
//!   rotguard --remove FILE...     Strip stored tags
//!   rotguard --help               Show help

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use rotguard_core::{Algorithm, DEFAULT_NAMESPACE, VerifyConfig};
use rotguard_verify::{Status, Verdict, Verifier, VerifyError};

#[derive(Parser)]
#[command(
    name = "rotguard",
    version,
    about = "Detect silent file corruption with checksums stored in extended attributes",
    long_about = "rotguard stores a content hash and the modification time of each file in \
                  its extended attributes. On later runs a file whose content changed while \
                  its mtime did not is reported as corrupt.\n\n\
                  Exit status: 0 if all files are fine, 1 if some files could not be \
                  checked, 2 if corruption was found."
)]
struct Cli {
    /// Files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Hash algorithm (sha224, sha256, sha384, sha512, sha512-256, blake3)
    #[arg(short, long, default_value = "sha256", value_parser = Algorithm::from_name)]
    algorithm: Algorithm,

    /// Extended attribute namespace
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Report what would happen without writing attributes
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Remove stored attributes instead of verifying
    #[arg(long)]
    remove: bool,

    /// Less output: -q hides <ok>, -qq hides everything but corrupt files
    #[arg(short, long, action = ArgAction::Count)]
    quiet: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Number of files to check in parallel (0 = one per CPU)
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Per-run tallies used for the exit status.
#[derive(Debug, Default)]
struct Summary {
    corrupt: usize,
    errors: usize,
}

impl Summary {
    /// Tally verification results. A verdict whose record could not be
    /// written counts as an error; corruption is counted either way.
    fn tally(results: &[Result<Verdict, VerifyError>]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result {
                Ok(verdict) => {
                    if verdict.status.is_corrupt() {
                        summary.corrupt += 1;
                    }
                    if verdict.write_error.is_some() {
                        summary.errors += 1;
                    }
                }
                Err(_) => summary.errors += 1,
            }
        }
        summary
    }

    /// Corruption outranks errors.
    fn status_code(&self) -> u8 {
        if self.corrupt > 0 {
            2
        } else if self.errors > 0 {
            1
        } else {
            0
        }
    }

    fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status_code())
    }
}

/// JSON form of one file's result.
#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    verdict: Option<&'a Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = VerifyConfig::builder()
        .algorithm(cli.algorithm)
        .namespace(cli.namespace.clone())
        .dry_run(cli.dry_run)
        .build()
        .context("Invalid configuration")?;
    let verifier = Verifier::new(config);

    let summary = if cli.remove {
        run_remove(&verifier, &cli)?
    } else {
        run_verify(&verifier, &cli)?
    };

    Ok(summary.exit_code())
}

/// Install a stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Apply `f` to every file, in parallel when more than one job is requested.
/// Results keep the order of `files`.
fn for_each_file<T, F>(files: &[PathBuf], jobs: usize, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&PathBuf) -> T + Sync + Send,
{
    if jobs == 1 {
        return Ok(files.iter().map(f).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to start worker pool")?;
    Ok(pool.install(|| files.par_iter().map(f).collect()))
}

/// Verify every file and print the results.
fn run_verify(verifier: &Verifier, cli: &Cli) -> Result<Summary> {
    let results = for_each_file(&cli.files, cli.jobs, |path| verifier.verify_path(path))?;
    let summary = Summary::tally(&results);

    match cli.format {
        OutputFormat::Text => {
            let mut out = io::stdout().lock();
            let mut err = io::stderr().lock();
            for (path, result) in cli.files.iter().zip(&results) {
                match result {
                    Ok(verdict) => print_verdict(&mut out, &mut err, path, verdict, cli.quiet)?,
                    Err(e) => print_error(&mut err, path, e)?,
                }
            }
        }
        OutputFormat::Json => {
            let reports: Vec<FileReport> = cli
                .files
                .iter()
                .zip(&results)
                .map(|(path, result)| FileReport {
                    path,
                    verdict: result.as_ref().ok(),
                    removed: None,
                    error: result.as_ref().err().map(ToString::to_string),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(summary)
}

/// Strip stored attributes from every file.
fn run_remove(verifier: &Verifier, cli: &Cli) -> Result<Summary> {
    let results = for_each_file(&cli.files, cli.jobs, |path| verifier.remove_path(path))?;

    let summary = Summary {
        corrupt: 0,
        errors: results.iter().filter(|r| r.is_err()).count(),
    };

    match cli.format {
        OutputFormat::Text => {
            let mut out = io::stdout().lock();
            let mut err = io::stderr().lock();
            for (path, result) in cli.files.iter().zip(&results) {
                match result {
                    Ok(true) if cli.quiet < 2 => writeln!(out, "<removed> {}", path.display())?,
                    Ok(false) if cli.quiet == 0 => writeln!(out, "<untagged> {}", path.display())?,
                    Ok(_) => {}
                    Err(e) => print_error(&mut err, path, e)?,
                }
            }
        }
        OutputFormat::Json => {
            let reports: Vec<FileReport> = cli
                .files
                .iter()
                .zip(&results)
                .map(|(path, result)| FileReport {
                    path,
                    verdict: None,
                    removed: result.as_ref().ok().copied(),
                    error: result.as_ref().err().map(ToString::to_string),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(summary)
}

/// Print one verdict in the text format. Corruption and failed writes go
/// to `err`, everything else to `out`.
fn print_verdict<O: Write, E: Write>(
    out: &mut O,
    err: &mut E,
    path: &Path,
    verdict: &Verdict,
    quiet: u8,
) -> io::Result<()> {
    match verdict.status {
        Status::Ok => {
            if quiet == 0 {
                writeln!(out, "<ok> {}", path.display())?;
            }
        }
        Status::New => {
            if quiet < 2 {
                writeln!(out, "<new> {}", path.display())?;
            }
        }
        Status::Outdated => {
            if quiet < 2 {
                writeln!(out, "<outdated> {}", path.display())?;
                writeln!(out, " stored: {}", verdict.stored)?;
                writeln!(out, " actual: {}", verdict.actual)?;
            }
        }
        Status::Corrupt => {
            writeln!(err, "Error: corrupt file {:?}", path)?;
            writeln!(err, "<corrupt> {}", path.display())?;
            writeln!(err, " stored: {}", verdict.stored)?;
            writeln!(err, " actual: {}", verdict.actual)?;
        }
    }

    if let Some(e) = &verdict.write_error {
        writeln!(err, "Warning: {}: {e}", path.display())?;
    }
    Ok(())
}

fn print_error<E: Write>(err: &mut E, path: &Path, e: &VerifyError) -> io::Result<()> {
    if e.is_recoverable() {
        writeln!(err, "Warning: {}: {e}", path.display())
    } else {
        writeln!(err, "Error: {}: {e}", path.display())
    }
}
