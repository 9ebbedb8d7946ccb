use crate::engine::capture::OutputCapture;
use crate::engine::result::{ErrorInfo, TestInfo, TestResult};
use crate::engine::suite::Runnable;
use crate::metadata::{LeaderboardColumn, LeaderboardOrder, TestMetadata, Visibility};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::{
    cell::Cell,
    fmt::{self, Debug},
    io::{self, Write},
    panic::{self, AssertUnwindSafe},
    sync::Once,
};

/// Reason a test body gives for not passing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TestFailure {
    message: String,
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn into_message(self) -> String {
        self.message
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<io::Error> for TestFailure {
    fn from(err: io::Error) -> Self {
        Self::new(format!("IOError: {err}"))
    }
}

impl From<serde_json::Error> for TestFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("SerializationError: {err}"))
    }
}

pub type TestOutcome = Result<(), TestFailure>;

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestOutcome {
    if condition {
        Ok(())
    } else {
        Err(TestFailure::new(format!("AssertionError: {}", message.into())))
    }
}

/// Fails with `AssertionError: <left> != <right>` unless both sides are equal.
pub fn ensure_eq<T: PartialEq + Debug>(left: T, right: T) -> TestOutcome {
    if left == right {
        Ok(())
    } else {
        Err(TestFailure::new(format!(
            "AssertionError: {left:?} != {right:?}"
        )))
    }
}

/// Handle a test body receives while it runs.
pub struct TestContext<'a> {
    capture: &'a mut OutputCapture,
    leaderboard_value: Option<Value>,
}

impl<'a> TestContext<'a> {
    pub(crate) fn new(capture: &'a mut OutputCapture) -> Self {
        Self {
            capture,
            leaderboard_value: None,
        }
    }

    pub fn stdout(&mut self) -> &mut dyn Write {
        self.capture.stdout()
    }

    pub fn stderr(&mut self) -> &mut dyn Write {
        self.capture.stderr()
    }

    /// Records the value of this test's leaderboard column. The last call wins.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.leaderboard_value = Some(value.into());
    }

    /// Like [`TestContext::set_value`], for any serializable value.
    pub fn set_serialized_value<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        self.leaderboard_value = Some(serde_json::to_value(value)?);
        Ok(())
    }

    fn into_leaderboard_value(self) -> Option<Value> {
        self.leaderboard_value
    }
}

type TestBody = Box<dyn Fn(&mut TestContext<'_>) -> TestOutcome>;

/// A single test: a name, its grading metadata and the body to execute.
///
/// The metadata builders play the role of annotations on the test function:
///
/// ```
/// use json_grader::{TestCase, Visibility, ensure_eq};
///
/// let test = TestCase::new("test_addition", |_ctx| ensure_eq(1 + 1, 2))
///     .weight(2.0)
///     .visibility(Visibility::AfterDueDate)
///     .tags(["arithmetic"]);
/// assert_eq!(test.metadata().weight(), 2.0);
/// ```
pub struct TestCase {
    name: String,
    description: Option<String>,
    metadata: TestMetadata,
    body: TestBody,
}

impl TestCase {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut TestContext<'_>) -> TestOutcome + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            metadata: TestMetadata::default(),
            body: Box::new(body),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.metadata.weight = Some(weight);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.metadata.visibility = Some(visibility);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Reports this test as a leaderboard column instead of a graded test.
    pub fn leaderboard_column(mut self, name: impl Into<String>) -> Self {
        let order = self.metadata.leaderboard.take().and_then(|c| c.order);
        self.metadata.leaderboard = Some(LeaderboardColumn {
            name: name.into(),
            order,
        });
        self
    }

    /// Sort order of the leaderboard column. Has no effect on graded tests.
    pub fn leaderboard_order(mut self, order: LeaderboardOrder) -> Self {
        if let Some(column) = self.metadata.leaderboard.as_mut() {
            column.order = Some(order);
        } else {
            warn!(
                "'{}' declares a leaderboard order without a leaderboard column",
                self.name
            );
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &TestMetadata {
        &self.metadata
    }

    /// First non-empty line of the description.
    pub fn short_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .and_then(|d| d.lines().map(str::trim).find(|l| !l.is_empty()))
    }

    fn info<'a>(&'a self, leaderboard_value: Option<&'a Value>) -> TestInfo<'a> {
        TestInfo {
            name: &self.name,
            description: self.short_description(),
            metadata: &self.metadata,
            leaderboard_value,
        }
    }
}

impl Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_PANIC_HOOK: Once = Once::new();

/// Runs `f` with the panic message of the current thread suppressed. A panic in
/// a test body is reported as that test's error, not on the console. Other
/// threads, and this one outside of `f`, keep the previously installed hook.
fn with_quiet_panics<R>(f: impl FnOnce() -> R) -> R {
    QUIET_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.get() {
                previous(info);
            }
        }));
    });
    let outer = QUIET_PANICS.replace(true);
    let r = f();
    QUIET_PANICS.set(outer);
    r
}

impl Runnable for TestCase {
    fn run(&self, result: &mut dyn TestResult) {
        debug!("Running test '{}'", self.name);
        result.start_test(&self.info(None));

        let mut ctx = TestContext::new(result.state_mut().capture_mut());
        let outcome = with_quiet_panics(|| {
            panic::catch_unwind(AssertUnwindSafe(|| (self.body)(&mut ctx)))
        });
        let value = ctx.into_leaderboard_value();
        let info = self.info(value.as_ref());

        match outcome {
            Ok(Ok(())) => {
                debug!("✅ '{}' passed", self.name);
                result.add_success(&info);
            }
            Ok(Err(failure)) => {
                debug!("❌ '{}' failed: {failure}", self.name);
                result.add_failure(&info, &ErrorInfo::from(failure));
            }
            Err(payload) => {
                let err = ErrorInfo::from_panic(payload.as_ref());
                debug!("💥 '{}' panicked: {err}", self.name);
                result.add_error(&info, &err);
            }
        }
        result.stop_test(&info);
    }

    fn count_test_cases(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::result::ResultState;

    #[derive(Default)]
    struct Recorder {
        state: Option<ResultState>,
        events: Vec<String>,
        values: Vec<Option<Value>>,
    }

    impl Recorder {
        fn new(buffer: bool) -> Self {
            Self {
                state: Some(ResultState::new(buffer, false)),
                ..Default::default()
            }
        }
    }

    impl TestResult for Recorder {
        fn state(&self) -> &ResultState {
            self.state.as_ref().unwrap()
        }
        fn state_mut(&mut self) -> &mut ResultState {
            self.state.as_mut().unwrap()
        }
        fn start_test(&mut self, test: &TestInfo<'_>) {
            self.state_mut().start_test(test);
            self.events.push(format!("start {test}"));
        }
        fn add_success(&mut self, test: &TestInfo<'_>) {
            self.state_mut().add_success(test);
            self.events.push(format!("success {test}"));
            self.values.push(test.leaderboard_value.cloned());
        }
        fn add_failure(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
            self.state_mut().add_failure(test, err);
            self.events.push(format!("failure {test}: {err}"));
        }
        fn add_error(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
            self.state_mut().add_error(test, err);
            self.events.push(format!("error {test}: {err}"));
        }
        fn stop_test(&mut self, test: &TestInfo<'_>) {
            self.state_mut().stop_test(test);
            self.events.push(format!("stop {test}"));
        }
    }

    #[test]
    fn should_report_success() {
        let mut recorder = Recorder::new(true);
        TestCase::new("test_ok", |_| Ok(())).run(&mut recorder);
        assert_eq!(recorder.events, vec!["start test_ok", "success test_ok", "stop test_ok"]);
    }

    #[test]
    fn should_report_returned_failures() {
        let mut recorder = Recorder::new(true);
        TestCase::new("test_eq", |_| ensure_eq("x", "y")).run(&mut recorder);
        assert_eq!(
            recorder.events[1],
            "failure test_eq: AssertionError: \"x\" != \"y\""
        );
        assert_eq!(recorder.state().failures.len(), 1);
    }

    #[test]
    fn should_report_panics_as_errors() {
        let mut recorder = Recorder::new(true);
        TestCase::new("test_panics", |_| panic!("index out of bounds")).run(&mut recorder);
        assert_eq!(recorder.events[1], "error test_panics: index out of bounds");
        assert_eq!(recorder.state().errors.len(), 1);
        assert_eq!(recorder.events[2], "stop test_panics");
    }

    #[test]
    fn should_silence_panics_only_inside_test_bodies() {
        let mut recorder = Recorder::new(true);
        let inner = TestCase::new("test_inner", |_| ensure(QUIET_PANICS.get(), "loud inner"));
        TestCase::new("test_outer", move |_| {
            ensure(QUIET_PANICS.get(), "loud before")?;
            let mut nested = Recorder::new(true);
            inner.run(&mut nested);
            ensure(nested.state().successes == 1, "loud inner")?;
            ensure(QUIET_PANICS.get(), "loud after nested run")?;
            panic!("silenced")
        })
        .run(&mut recorder);

        assert_eq!(recorder.events[1], "error test_outer: silenced");
        assert!(!QUIET_PANICS.get());
    }

    #[test]
    fn should_hand_over_leaderboard_value() {
        let mut recorder = Recorder::new(true);
        TestCase::new("test_speed", |ctx| {
            ctx.set_value(1);
            ctx.set_value(42);
            Ok(())
        })
        .leaderboard_column("high_score")
        .run(&mut recorder);
        assert_eq!(recorder.values, vec![Some(Value::from(42))]);
    }

    #[test]
    fn should_set_serialized_value() {
        #[derive(Serialize)]
        struct Timing {
            millis: u32,
        }
        let mut recorder = Recorder::new(true);
        TestCase::new("test_timing", |ctx| {
            ctx.set_serialized_value(&Timing { millis: 12 })?;
            Ok(())
        })
        .run(&mut recorder);
        assert_eq!(
            recorder.values,
            vec![Some(serde_json::json!({ "millis": 12 }))]
        );
    }

    #[test]
    fn should_build_metadata() {
        let test = TestCase::new("test_meta", |_| Ok(()))
            .description("\n  Checks the metadata.\n  More details.")
            .weight(3.5)
            .visibility(Visibility::Hidden)
            .tags(["a", "b"])
            .leaderboard_order(LeaderboardOrder::Asc)
            .leaderboard_column("column")
            .leaderboard_order(LeaderboardOrder::Desc);

        assert_eq!(test.short_description(), Some("Checks the metadata."));
        assert_eq!(
            test.metadata(),
            &TestMetadata {
                weight: Some(3.5),
                visibility: Some(Visibility::Hidden),
                tags: vec!["a".to_string(), "b".to_string()],
                leaderboard: Some(LeaderboardColumn {
                    name: "column".to_string(),
                    order: Some(LeaderboardOrder::Desc),
                }),
            }
        );
    }

    #[test]
    fn ensure_should_prefix_assertion_error() {
        assert_eq!(ensure(true, "unused"), Ok(()));
        assert_eq!(
            ensure(false, "list is empty"),
            Err(TestFailure::new("AssertionError: list is empty"))
        );
    }
}
