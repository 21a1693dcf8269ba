//! fsx - run single filesystem mutations as a batch
//!
//! Every operand becomes one operation contract call. Failures are collected
//! and reported together once the batch has finished.

use clap::{Parser, Subcommand, ValueEnum};
use fsexec::{
    CancelToken, ConflictStrategy, Error as FsexecError, ErrorList, Estimator, Executor, IoError,
    Operation, Progress, Request, Status, create_progress_bar,
};
use indicatif::ProgressBar;
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// fsx - filesystem mutation executor
///
/// Usage:
///   fsx mkdir -p DIR...
///   fsx cp [-c fail|overwrite|append] SOURCE... DEST
///   fsx ln TARGET LINK
#[derive(Parser, Debug)]
#[command(name = "fsx", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    output: OutputMode,

    /// Disable progress bar and summary
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print the outcome of every operation
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create empty files
    Mkfile {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Create directories
    Mkdir {
        /// Create missing parent directories, no error if existing
        #[arg(short = 'p', long)]
        parents: bool,

        /// Permission bits (octal)
        #[arg(short = 'm', long, default_value = "755", value_parser = parse_mode)]
        mode: u32,

        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove files or symbolic links
    Rm {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove empty directories
    Rmdir {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy files; symbolic links are recreated, not followed
    ///
    /// When multiple sources are given, DEST must be a directory.
    Cp {
        /// What to do when a destination already exists
        #[arg(short = 'c', long = "on-conflict", value_enum, default_value = "fail")]
        on_conflict: Strategy,

        /// Ask before overwriting or appending
        #[arg(short = 'i', long)]
        interactive: bool,

        /// SOURCE... DEST
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,
    },

    /// Create a symbolic link at LINK pointing to TARGET
    Ln {
        /// What to do when LINK already exists
        #[arg(short = 'c', long = "on-conflict", value_enum, default_value = "fail")]
        on_conflict: Strategy,

        /// Ask before replacing an existing link
        #[arg(short = 'i', long)]
        interactive: bool,

        target: PathBuf,
        link: PathBuf,
    },
}

impl Command {
    fn interactive(&self) -> bool {
        match self {
            Self::Cp { interactive, .. } | Self::Ln { interactive, .. } => *interactive,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Fail if destination exists
    Fail,
    /// Replace existing destinations
    Overwrite,
    /// Resume writing at the end of existing destinations
    Append,
}

impl From<Strategy> for ConflictStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Fail => ConflictStrategy::Fail,
            Strategy::Overwrite => ConflictStrategy::Overwrite,
            Strategy::Append => ConflictStrategy::AppendToFile,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

fn parse_mode(text: &str) -> Result<u32, String> {
    match u32::from_str_radix(text, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(format!("invalid octal mode '{text}'")),
    }
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Target '{path}' is not a directory (when copying multiple sources)")]
    MultiSourceTargetNotDirectory { path: PathBuf },

    #[error("Source has no filename: {path}")]
    SourceHasNoFilename { path: PathBuf },

    #[error("{0}")]
    Operations(#[from] FsexecError),

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn label(&self) -> &'static str {
        match self {
            Self::MultiSourceTargetNotDirectory { .. } | Self::SourceHasNoFilename { .. } => {
                "invalid_input"
            }
            Self::Operations(FsexecError::Cancelled) => "cancelled",
            Self::Operations(_) => "io_error",
            Self::JsonSerialize { .. } => "internal",
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::MultiSourceTargetNotDirectory { .. } | Self::SourceHasNoFilename { .. } => 2,
            Self::Operations(FsexecError::Cancelled) => 130,
            _ => 1,
        }
    }
}

fn main() {
    if let Err(error) = run() {
        if let CliError::Operations(FsexecError::Failed(entries)) = &error {
            // Entries were already printed one by one.
            eprintln!("{} error(s)", entries.len());
        } else {
            eprintln!("error[{}]: {}", error.label(), error);
        }
        std::process::exit(error.exit_code());
    }
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    let operations = plan(&args.command)?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            if cancel.is_requested() {
                eprintln!("\nForce quit.");
                std::process::exit(130);
            }
            cancel.request();
            eprintln!("\nCancelling... Press Ctrl+C again to abort immediately.");
        })
        .ok();
    }

    let interactive = args.command.interactive();
    let pb = if args.output == OutputMode::Human && !args.quiet && !interactive {
        Some(create_progress_bar(total_bytes(&operations)))
    } else {
        None
    };
    let estimator = Estimator::new();
    let sink = Tee {
        estimator: &estimator,
        bar: pb.as_ref(),
    };

    let errors = ErrorList::new();
    let executor = Executor::new();
    let start = Instant::now();
    let mut outcomes = Vec::with_capacity(operations.len());
    let mut cancelled = false;

    for operation in &operations {
        if cancel.is_requested() {
            cancelled = true;
            break;
        }
        let mut request = Request::new(&errors)
            .with_progress(&sink)
            .with_cancel_token(cancel.clone());
        if matches!(operation, Operation::Copy { .. }) {
            request = request.cancellable();
        }
        if interactive {
            request = request.with_confirm(&ask);
        }

        let before = errors.len();
        let status = executor.run(&request, operation);
        print_new_errors(&errors, before, args.output);
        if args.verbose && args.output == OutputMode::Human {
            println!(
                "{} {}: {}",
                operation.kind(),
                operation.destination().display(),
                status
            );
        }
        outcomes.push((operation, status));
        if status == Status::Cancelled {
            cancelled = true;
            break;
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let entries = errors.into_entries();
    match args.output {
        OutputMode::Human if !args.quiet => {
            print_summary(&outcomes, &estimator, start.elapsed(), cancelled);
        }
        OutputMode::Human => {}
        OutputMode::Json => emit_json(&outcomes, &entries, &estimator, cancelled)?,
    }

    if cancelled {
        return Err(FsexecError::Cancelled.into());
    }
    if entries.is_empty() {
        Ok(())
    } else {
        Err(FsexecError::Failed(entries).into())
    }
}

/// Turn the command line into one operation per operand.
fn plan(command: &Command) -> CliResult<Vec<Operation>> {
    let operations = match command {
        Command::Mkfile { paths } => paths
            .iter()
            .map(|path| Operation::MakeFile { path: path.clone() })
            .collect(),
        Command::Mkdir {
            parents,
            mode,
            paths,
        } => paths
            .iter()
            .map(|path| Operation::MakeDir {
                path: path.clone(),
                parents: *parents,
                mode: *mode,
            })
            .collect(),
        Command::Rm { paths } => paths
            .iter()
            .map(|path| Operation::RemoveFile { path: path.clone() })
            .collect(),
        Command::Rmdir { paths } => paths
            .iter()
            .map(|path| Operation::RemoveDir { path: path.clone() })
            .collect(),
        Command::Cp {
            on_conflict, paths, ..
        } => plan_copies(paths, (*on_conflict).into())?,
        Command::Ln {
            on_conflict,
            target,
            link,
            ..
        } => vec![Operation::Link {
            target: target.clone(),
            link: link.clone(),
            strategy: (*on_conflict).into(),
        }],
    };
    Ok(operations)
}

fn plan_copies(paths: &[PathBuf], strategy: ConflictStrategy) -> CliResult<Vec<Operation>> {
    let Some((dest, sources)) = paths.split_last() else {
        return Ok(Vec::new());
    };
    let dest_is_dir = dest.is_dir();
    if sources.len() > 1 && !dest_is_dir {
        return Err(CliError::MultiSourceTargetNotDirectory { path: dest.clone() });
    }

    sources
        .iter()
        .map(|src| {
            let dst = if dest_is_dir {
                let name = src
                    .file_name()
                    .ok_or_else(|| CliError::SourceHasNoFilename { path: src.clone() })?;
                dest.join(name)
            } else {
                dest.clone()
            };
            Ok(Operation::Copy {
                src: src.clone(),
                dst,
                strategy,
            })
        })
        .collect()
}

fn total_bytes(operations: &[Operation]) -> u64 {
    operations
        .iter()
        .map(|operation| match operation {
            Operation::Copy { src, .. } | Operation::RemoveFile { path: src } => {
                std::fs::symlink_metadata(src).map_or(0, |meta| meta.len())
            }
            _ => 0,
        })
        .sum()
}

/// Feeds both the counting estimator and the optional progress bar.
struct Tee<'a> {
    estimator: &'a Estimator,
    bar: Option<&'a ProgressBar>,
}

impl Progress for Tee<'_> {
    fn update(&self, source: Option<&Path>, destination: Option<&Path>, items: u64, bytes: u64) {
        self.estimator.update(source, destination, items, bytes);
        if let Some(bar) = self.bar {
            Progress::update(bar, source, destination, items, bytes);
        }
    }
}

fn ask(_: &Request<'_>, src: &Path, dst: &Path) -> bool {
    eprint!(
        "fsx: replace '{}' with '{}'? [y/N] ",
        dst.display(),
        src.display()
    );
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
}

fn print_new_errors(errors: &ErrorList, before: usize, output: OutputMode) {
    if output != OutputMode::Human {
        return;
    }
    for entry in errors.entries().iter().skip(before) {
        eprintln!("error[{}]: {}", entry.code, entry);
    }
}

fn print_summary(
    outcomes: &[(&Operation, Status)],
    estimator: &Estimator,
    elapsed: Duration,
    cancelled: bool,
) {
    let done = outcomes.iter().filter(|(_, s)| *s == Status::Done).count();
    let declined = outcomes
        .iter()
        .filter(|(_, s)| *s == Status::Declined)
        .count();
    let failed = outcomes.iter().filter(|(_, s)| !s.is_success()).count();

    let mut parts = vec![format!("{done} done")];
    if declined > 0 {
        parts.push(format!("{declined} declined"));
    }
    if failed > 0 {
        parts.push(format!("{failed} failed"));
    }
    println!(
        "{} ({}, {:.2?})",
        parts.join(", "),
        format_bytes(estimator.bytes()),
        elapsed
    );
    if cancelled {
        eprintln!("Cancelled. Re-run cp with -c append to resume partial files.");
    }
}

fn emit_json(
    outcomes: &[(&Operation, Status)],
    entries: &[IoError],
    estimator: &Estimator,
    cancelled: bool,
) -> CliResult<()> {
    let items: Vec<Value> = outcomes
        .iter()
        .map(|(operation, status)| {
            json!({
                "op": operation.kind(),
                "destination": operation.destination().display().to_string(),
                "status": status.as_str(),
                "code": status.code(),
            })
        })
        .collect();
    let errors =
        serde_json::to_value(entries).map_err(|source| CliError::JsonSerialize { source })?;

    let payload = json!({
        "schema_version": "1.0",
        "items": items,
        "errors": errors,
        "items_completed": estimator.items(),
        "bytes": estimator.bytes(),
        "cancelled": cancelled,
    });
    let serialized =
        serde_json::to_string(&payload).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
