use crate::collector::JsonTestResult;
use crate::engine::{InterruptRegistry, Lifecycle, Runnable, TestResult};
use crate::error::Result;
use crate::metadata::Visibility;
use log::info;
use std::{io::Write, time::Instant};

/// Runs tests and writes their grading report to a stream as JSON.
///
/// ```
/// use json_grader::{JsonTestRunner, TestCase, TestSuite};
///
/// let suite = TestSuite::new("example").with_test(TestCase::new("test_ok", |_| Ok(())).weight(1.0));
/// let mut out = vec![];
/// let result = JsonTestRunner::new(&mut out).run(&suite).unwrap();
/// assert!(result.was_successful());
/// assert!(String::from_utf8(out).unwrap().contains("\"score\": 1.0"));
/// ```
#[derive(Debug)]
pub struct JsonTestRunner<W: Write> {
    stream: W,
    descriptions: bool,
    failfast: bool,
    buffer: bool,
    visibility: Visibility,
}

impl<W: Write> JsonTestRunner<W> {
    /// Runner with output buffering and descriptions on, fail-fast off and
    /// `visible` as the run visibility.
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            descriptions: true,
            failfast: false,
            buffer: true,
            visibility: Visibility::default(),
        }
    }

    /// Whether test output is captured and embedded in the report.
    pub fn with_buffer(mut self, buffer: bool) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_failfast(mut self, failfast: bool) -> Self {
        self.failfast = failfast;
        self
    }

    /// Whether a test's short description replaces its name in the report.
    pub fn with_descriptions(mut self, descriptions: bool) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    fn make_result(&self) -> JsonTestResult {
        JsonTestResult::new(self.descriptions, self.buffer, self.failfast)
    }

    /// Runs `test` to completion and writes the report.
    ///
    /// Every call starts from an empty report. The returned result gives access
    /// to the collected records and the pass/fail counters.
    pub fn run(&mut self, test: &dyn Runnable) -> Result<JsonTestResult> {
        let mut result = self.make_result();
        InterruptRegistry::global().register(&result);

        let start = Instant::now();
        if let Lifecycle::Supported(hooks) = result.lifecycle() {
            hooks.start_test_run();
        }
        test.run(&mut result);
        if let Lifecycle::Supported(hooks) = result.lifecycle() {
            hooks.stop_test_run();
        }
        let elapsed = start.elapsed();

        let mut report = result.to_report(self.visibility);
        report.finalize(elapsed);
        info!(
            "📝 Writing report: score {} / {} in {}s",
            report.score,
            report.max_score(),
            report.execution_time
        );
        report.write_json(&mut self.stream)?;
        Ok(result)
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}
