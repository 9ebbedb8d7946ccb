use crate::engine::case::TestCase;
use crate::engine::result::TestResult;
use log::{info, warn};

/// Anything the engine can execute against a result sink.
pub trait Runnable {
    /// Runs every contained test, in order, reporting each outcome to `result`.
    /// Returns once all of them completed or the result asked to stop.
    fn run(&self, result: &mut dyn TestResult);

    fn count_test_cases(&self) -> usize;
}

/// Ordered collection of tests and nested suites.
#[derive(Debug, Default)]
pub struct TestSuite {
    name: String,
    tests: Vec<SuiteItem>,
}

#[derive(Debug)]
enum SuiteItem {
    Case(TestCase),
    Suite(TestSuite),
}

impl SuiteItem {
    fn as_runnable(&self) -> &dyn Runnable {
        match self {
            SuiteItem::Case(case) => case as &dyn Runnable,
            SuiteItem::Suite(suite) => suite,
        }
    }
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: vec![],
        }
    }

    pub fn with_test(mut self, test: TestCase) -> Self {
        self.add_test(test);
        self
    }

    pub fn with_suite(mut self, suite: TestSuite) -> Self {
        self.add_suite(suite);
        self
    }

    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(SuiteItem::Case(test));
    }

    pub fn add_suite(&mut self, suite: TestSuite) {
        self.tests.push(SuiteItem::Suite(suite));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl Runnable for TestSuite {
    fn run(&self, result: &mut dyn TestResult) {
        info!(
            "🧪 Running suite '{}' ({} test(s))",
            self.name,
            self.count_test_cases()
        );
        for item in &self.tests {
            if result.state().should_stop() {
                warn!("⚠️  Stop requested, skipping the rest of '{}'", self.name);
                break;
            }
            item.as_runnable().run(result);
        }
    }

    fn count_test_cases(&self) -> usize {
        self.tests
            .iter()
            .map(|t| t.as_runnable().count_test_cases())
            .sum()
    }
}

impl FromIterator<TestCase> for TestSuite {
    fn from_iter<T: IntoIterator<Item = TestCase>>(iter: T) -> Self {
        let mut suite = TestSuite::default();
        for test in iter {
            suite.add_test(test);
        }
        suite
    }
}
