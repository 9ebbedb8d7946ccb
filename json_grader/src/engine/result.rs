use crate::engine::capture::OutputCapture;
use crate::engine::case::TestFailure;
use crate::engine::interrupt::StopFlag;
use crate::metadata::TestMetadata;
use log::{debug, warn};
use serde_json::Value;
use std::{any::Any, fmt};

/// What a result sink gets to know about a test.
#[derive(Debug, Clone, Copy)]
pub struct TestInfo<'a> {
    pub name: &'a str,
    /// First line of the test's description, if it has one.
    pub description: Option<&'a str>,
    pub metadata: &'a TestMetadata,
    /// Value the test body handed to its leaderboard setter. Always `None`
    /// before the body ran.
    pub leaderboard_value: Option<&'a Value>,
}

impl fmt::Display for TestInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Description of why a test did not pass.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ErrorInfo {
    message: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds the description of a panic from its payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "test panicked".to_string()
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TestFailure> for ErrorInfo {
    fn from(failure: TestFailure) -> Self {
        Self::new(failure.into_message())
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Hooks called once before the first and once after the last test of a run.
pub trait RunHooks {
    fn start_test_run(&mut self);
    fn stop_test_run(&mut self);
}

/// Whether a result sink takes part in the run lifecycle.
pub enum Lifecycle<'a> {
    Supported(&'a mut dyn RunHooks),
    Unsupported,
}

/// Bookkeeping every result sink carries: counters, recorded problems, the
/// stop flag and the output capture of the running test.
#[derive(Debug)]
pub struct ResultState {
    pub tests_run: usize,
    pub successes: usize,
    /// `(test name, message)` of tests whose body returned a failure.
    pub failures: Vec<(String, String)>,
    /// `(test name, message)` of tests whose body panicked.
    pub errors: Vec<(String, String)>,
    pub failfast: bool,
    stop: StopFlag,
    capture: OutputCapture,
}

impl ResultState {
    pub fn new(buffer: bool, failfast: bool) -> Self {
        Self {
            tests_run: 0,
            successes: 0,
            failures: vec![],
            errors: vec![],
            failfast,
            stop: StopFlag::default(),
            capture: OutputCapture::new(buffer),
        }
    }

    pub fn capture(&self) -> &OutputCapture {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut OutputCapture {
        &mut self.capture
    }

    pub fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }

    pub fn should_stop(&self) -> bool {
        self.stop.is_set()
    }

    /// Asks the engine not to start any further test.
    pub fn stop(&self) {
        self.stop.set();
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    pub fn start_test(&mut self, _test: &TestInfo<'_>) {
        self.tests_run += 1;
        self.capture.start();
    }

    pub fn stop_test(&mut self, test: &TestInfo<'_>) {
        if let Err(err) = self.capture.finish() {
            warn!("unable to mirror the output of '{test}'");
            debug!("error: {err:?}");
        }
    }

    pub fn add_success(&mut self, _test: &TestInfo<'_>) {
        self.successes += 1;
    }

    pub fn add_error(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
        self.errors.push((test.name.to_string(), err.message().to_string()));
        self.record_problem();
    }

    pub fn add_failure(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
        self.failures
            .push((test.name.to_string(), err.message().to_string()));
        self.record_problem();
    }

    fn record_problem(&mut self) {
        self.capture.set_mirror_output(true);
        if self.failfast {
            self.stop();
        }
    }
}

/// The sink a test engine reports outcomes to.
///
/// Implementors only provide access to their [`ResultState`]; every callback has
/// a default that does the standard bookkeeping. Overrides are expected to call
/// the matching `ResultState` method first.
pub trait TestResult {
    fn state(&self) -> &ResultState;
    fn state_mut(&mut self) -> &mut ResultState;

    fn start_test(&mut self, test: &TestInfo<'_>) {
        self.state_mut().start_test(test);
    }

    fn stop_test(&mut self, test: &TestInfo<'_>) {
        self.state_mut().stop_test(test);
    }

    fn add_success(&mut self, test: &TestInfo<'_>) {
        self.state_mut().add_success(test);
    }

    /// The test body panicked.
    fn add_error(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
        self.state_mut().add_error(test, err);
    }

    /// The test body reported a failure.
    fn add_failure(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
        self.state_mut().add_failure(test, err);
    }

    fn lifecycle(&mut self) -> Lifecycle<'_> {
        Lifecycle::Unsupported
    }
}
