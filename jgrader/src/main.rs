use clap::{Parser, Subcommand, ValueEnum};
use json_grader::{LoggingMode, RunReport, SUBMISSION_BASE, check_submitted_files_in};
use log::{debug, info, warn};
use std::{error::Error, fs, path::PathBuf, process::ExitCode};

#[derive(Parser, Debug)]
#[command(
    name = "jgrader",
    version,
    about,
    long_about = "Inspect grading reports and student submissions."
)]
struct Cli {
    /// Verbosity of the grader's own logs. `RUST_LOG` takes precedence.
    #[arg(long, value_enum, global = true, default_value_t = CliLoggingMode::Normal)]
    logging_mode: CliLoggingMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the submitted files that are missing, one per line.
    ///
    /// Exits with status 1 when at least one file is missing.
    CheckFiles {
        /// Directory holding the submission.
        #[arg(long, default_value = SUBMISSION_BASE)]
        base: PathBuf,

        /// Paths relative to the submission directory.
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print a human readable summary of a JSON grading report.
    Summary {
        report: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum CliLoggingMode {
    Silent,
    Normal,
    Verbose,
}

impl From<CliLoggingMode> for LoggingMode {
    fn from(value: CliLoggingMode) -> Self {
        match value {
            CliLoggingMode::Silent => LoggingMode::Silent,
            CliLoggingMode::Normal => LoggingMode::Normal,
            CliLoggingMode::Verbose => LoggingMode::Verbose,
        }
    }
}

fn init_logging(mode: LoggingMode) {
    env_logger::Builder::new()
        .filter_level(mode.level_filter())
        .parse_default_env()
        .init();
}

fn check_files(base: PathBuf, paths: Vec<String>) -> ExitCode {
    let missing = check_submitted_files_in(&base, &paths);
    if missing.is_empty() {
        info!("✅ All {} file(s) present in '{}'", paths.len(), base.display());
        return ExitCode::SUCCESS;
    }
    warn!(
        "❌ {} of {} file(s) missing in '{}'",
        missing.len(),
        paths.len(),
        base.display()
    );
    for path in missing {
        println!("{path}");
    }
    ExitCode::FAILURE
}

fn summary(path: PathBuf) -> Result<ExitCode, Box<dyn Error>> {
    let content = fs::read_to_string(&path)?;
    let report: RunReport = serde_json::from_str(&content)?;
    debug!("Read report '{}'", path.display());

    for test in &report.tests {
        let visibility = test
            .visibility
            .map(|v| format!(" [{v}]"))
            .unwrap_or_default();
        println!("{}: {}/{}{visibility}", test.name, test.score, test.max_score);
    }
    for entry in &report.leaderboard {
        println!("leaderboard {}: {}", entry.name, entry.value);
    }
    println!(
        "Total: {}/{} in {}s",
        report.score,
        report.max_score(),
        report.execution_time
    );
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Cli::parse();
    init_logging(args.logging_mode.into());

    match args.command {
        Command::CheckFiles { base, paths } => Ok(check_files(base, paths)),
        Command::Summary { report } => summary(report),
    }
}
