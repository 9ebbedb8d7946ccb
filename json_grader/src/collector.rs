use crate::engine::{ErrorInfo, Lifecycle, ResultState, RunHooks, TestInfo, TestResult};
use crate::metadata::Visibility;
use crate::report::{LeaderboardEntry, ReportRecord, RunReport};
use log::{debug, info};

/// Result sink that turns test outcomes into report records.
///
/// Graded tests become [`ReportRecord`]s, tests declaring a leaderboard column
/// become [`LeaderboardEntry`]s. Either way, exactly one entry per executed test,
/// in execution order.
#[derive(Debug)]
pub struct JsonTestResult {
    state: ResultState,
    descriptions: bool,
    results: Vec<ReportRecord>,
    leaderboard: Vec<LeaderboardEntry>,
}

impl JsonTestResult {
    pub fn new(descriptions: bool, buffer: bool, failfast: bool) -> Self {
        Self {
            state: ResultState::new(buffer, failfast),
            descriptions,
            results: vec![],
            leaderboard: vec![],
        }
    }

    pub fn records(&self) -> &[ReportRecord] {
        &self.results
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn tests_run(&self) -> usize {
        self.state.tests_run
    }

    pub fn was_successful(&self) -> bool {
        self.state.was_successful()
    }

    /// Report of everything collected so far; execution time and score are left
    /// to [`RunReport::finalize`].
    pub fn to_report(&self, visibility: Visibility) -> RunReport {
        RunReport::new(visibility).with_results(self.results.clone(), self.leaderboard.clone())
    }

    fn description(&self, test: &TestInfo<'_>) -> String {
        match test.description {
            Some(doc) if self.descriptions => doc.to_string(),
            _ => test.name.to_string(),
        }
    }

    fn build_result(&mut self, test: &TestInfo<'_>, err: Option<&ErrorInfo>) {
        let metadata = test.metadata;

        if let Some(column) = &metadata.leaderboard {
            debug!("Leaderboard column '{}' from '{test}'", column.name);
            self.leaderboard.push(LeaderboardEntry {
                name: column.name.clone(),
                value: test.leaderboard_value.cloned().unwrap_or_default(),
                order: column.order,
            });
            return;
        }

        let weight = metadata.weight();
        let mut output = self.state.capture().captured_output();
        if let Some(err) = err {
            output
                .get_or_insert_with(String::new)
                .push_str(&format!("Test Failed: {err}\n"));
        }
        let record = ReportRecord {
            name: self.description(test),
            score: if err.is_none() { weight } else { 0.0 },
            max_score: weight,
            tags: (!metadata.tags.is_empty()).then(|| metadata.tags.clone()),
            output: output.filter(|o| !o.is_empty()),
            visibility: metadata.visibility,
        };
        debug!(
            "Recorded '{}': {}/{}",
            record.name,
            record.score,
            record.max_score
        );
        self.results.push(record);
    }
}

impl TestResult for JsonTestResult {
    fn state(&self) -> &ResultState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ResultState {
        &mut self.state
    }

    fn add_success(&mut self, test: &TestInfo<'_>) {
        self.state.add_success(test);
        self.build_result(test, None);
    }

    fn add_error(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
        self.state.add_error(test, err);
        // the output ends up in the report, not on the console
        self.state.capture_mut().set_mirror_output(false);
        self.build_result(test, Some(err));
    }

    fn add_failure(&mut self, test: &TestInfo<'_>, err: &ErrorInfo) {
        self.state.add_failure(test, err);
        self.state.capture_mut().set_mirror_output(false);
        self.build_result(test, Some(err));
    }

    fn lifecycle(&mut self) -> Lifecycle<'_> {
        Lifecycle::Supported(self)
    }
}

impl RunHooks for JsonTestResult {
    fn start_test_run(&mut self) {
        info!("🚀 Starting test run");
    }

    fn stop_test_run(&mut self) {
        info!(
            "🏁 Test run finished: {} run, {} failure(s), {} error(s), {} leaderboard entr(y/ies)",
            self.state.tests_run,
            self.state.failures.len(),
            self.state.errors.len(),
            self.leaderboard.len()
        );
    }
}
