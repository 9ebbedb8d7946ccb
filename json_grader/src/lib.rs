//! Grading reports out of test runs.
//!
//! Tests are [`TestCase`]s carrying their grading metadata (weight, visibility,
//! tags, leaderboard column). A [`JsonTestRunner`] executes them and writes a
//! single JSON document with one record per graded test, the leaderboard
//! entries, the total score and the execution time.
//!
//! ```
//! use json_grader::{JsonTestRunner, TestCase, TestSuite, Visibility, ensure_eq};
//!
//! let suite = TestSuite::new("calculator")
//!     .with_test(TestCase::new("test_add", |_| ensure_eq(2 + 2, 4)).weight(2.0))
//!     .with_test(
//!         TestCase::new("test_div", |_| ensure_eq(7 / 2, 4))
//!             .weight(3.0)
//!             .visibility(Visibility::AfterDueDate),
//!     );
//!
//! let mut out = vec![];
//! let result = JsonTestRunner::new(&mut out).run(&suite).unwrap();
//! assert_eq!(result.tests_run(), 2);
//!
//! let report: json_grader::RunReport = serde_json::from_slice(&out).unwrap();
//! assert_eq!(report.score, 2.0);
//! ```

pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod files;
pub mod metadata;
pub mod report;
pub mod runner;

mod utils;

pub use collector::JsonTestResult;
pub use config::{LoggingMode, ReportOutput, RunnerConfig, run_suite};
pub use engine::{
    InterruptRegistry, Runnable, TestCase, TestContext, TestFailure, TestOutcome, TestSuite,
    ensure, ensure_eq,
};
pub use error::{Error, Result};
pub use files::{SUBMISSION_BASE, check_submitted_files, check_submitted_files_in};
pub use metadata::{LeaderboardOrder, TestMetadata, Visibility};
pub use report::{LeaderboardEntry, ReportRecord, RunReport};
pub use runner::JsonTestRunner;
