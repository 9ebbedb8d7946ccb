//! The grading report and its JSON form.

use crate::metadata::{LeaderboardOrder, Visibility};
use serde::{Deserialize, Serialize};
use serde_json::{Value, ser::PrettyFormatter};
use std::{io::Write, time::Duration};

/// Outcome of one graded test.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ReportRecord {
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// A metric reported next to the grades. `value` and `order` are always
/// serialized, as `null` when unset.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub order: Option<LeaderboardOrder>,
}

/// The whole document written at the end of a run.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct RunReport {
    pub tests: Vec<ReportRecord>,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Seconds, always with two decimals.
    pub execution_time: String,
    pub score: f64,
    pub visibility: Visibility,
}

impl RunReport {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            tests: vec![],
            leaderboard: vec![],
            execution_time: format_execution_time(Duration::ZERO),
            score: 0.0,
            visibility,
        }
    }

    pub fn with_results(
        mut self,
        tests: Vec<ReportRecord>,
        leaderboard: Vec<LeaderboardEntry>,
    ) -> Self {
        self.tests = tests;
        self.leaderboard = leaderboard;
        self
    }

    /// Sets the execution time and the total score. Leaderboard entries do not
    /// count towards the score.
    pub fn finalize(&mut self, elapsed: Duration) {
        self.execution_time = format_execution_time(elapsed);
        // an empty f64 `sum` is -0.0
        self.score = self.tests.iter().fold(0.0, |acc, t| acc + t.score);
    }

    pub fn max_score(&self) -> f64 {
        self.tests.iter().fold(0.0, |acc, t| acc + t.max_score)
    }

    /// Writes the report as JSON indented with four spaces, plus a final newline.
    pub fn write_json<W: Write + ?Sized>(&self, writer: &mut W) -> serde_json::Result<()> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        self.serialize(&mut ser)?;
        writer.write_all(b"\n").map_err(serde_json::Error::io)?;
        writer.flush().map_err(serde_json::Error::io)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        let mut buf = vec![];
        self.write_json(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

pub fn format_execution_time(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}
