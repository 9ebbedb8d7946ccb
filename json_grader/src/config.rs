use crate::{
    collector::JsonTestResult,
    config::report_section::ReportSection,
    engine::Runnable,
    error::{Error, Result},
    metadata::Visibility,
    runner::JsonTestRunner,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub mod report_section;

pub use report_section::ReportOutput;

/// How chatty the grader is on its own logs (never in the report).
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    Silent,
    #[default]
    Normal,
    Verbose,
}

impl LoggingMode {
    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            LoggingMode::Silent => log::LevelFilter::Off,
            LoggingMode::Normal => log::LevelFilter::Info,
            LoggingMode::Verbose => log::LevelFilter::Debug,
        }
    }
}

/// Settings of a grading run, usually read from a JSON file.
///
/// Every field is optional in the file:
///
/// ```json
/// {
///     "logging_mode": "normal",
///     "buffer": true,
///     "failfast": false,
///     "descriptions": true,
///     "visibility": "visible",
///     "report": { "output": { "file": "/autograder/results/results.json" } }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct RunnerConfig {
    pub logging_mode: LoggingMode,
    pub buffer: bool,
    pub failfast: bool,
    pub descriptions: bool,
    pub visibility: Visibility,
    pub report: ReportSection,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            logging_mode: LoggingMode::default(),
            buffer: true,
            failfast: false,
            descriptions: true,
            visibility: Visibility::default(),
            report: ReportSection::default(),
        }
    }
}

impl RunnerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading configuration from '{}'", path.display());
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| Error::Config {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Runner writing to the configured output.
    pub fn build_runner(&self) -> Result<JsonTestRunner<Box<dyn Write>>> {
        let stream = self.report.output().open()?;
        Ok(self.configure(JsonTestRunner::new(stream)))
    }

    /// Applies these settings to a runner writing anywhere.
    pub fn configure<W: Write>(&self, runner: JsonTestRunner<W>) -> JsonTestRunner<W> {
        runner
            .with_buffer(self.buffer)
            .with_failfast(self.failfast)
            .with_descriptions(self.descriptions)
            .with_visibility(self.visibility)
    }
}

/// Runs `test` with the settings of `config` and writes the report where it says.
pub fn run_suite(test: &dyn Runnable, config: &RunnerConfig) -> Result<JsonTestResult> {
    config.build_runner()?.run(test)
}
