//! Minimal sequential test engine.
//!
//! It executes [`TestCase`]s and [`TestSuite`]s one after the other and reports
//! every outcome to a [`TestResult`] sink. The sink decides what to do with the
//! outcomes; the grading report is built by one such sink.

pub mod capture;
pub mod case;
pub mod interrupt;
pub mod result;
pub mod suite;

pub use capture::OutputCapture;
pub use case::{TestCase, TestContext, TestFailure, TestOutcome, ensure, ensure_eq};
pub use interrupt::{InterruptRegistry, StopFlag};
pub use result::{ErrorInfo, Lifecycle, ResultState, RunHooks, TestInfo, TestResult};
pub use suite::{Runnable, TestSuite};
