//! Grading metadata attached to a test case when it is defined.
//!
//! Nothing here has behavior of its own: the collector reads these values while
//! building the report and never mutates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// When the consumer of the report may reveal a result to the student.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Never shown.
    Hidden,
    /// Shown once the assignment's due date has passed.
    AfterDueDate,
    /// Shown only after the grades are explicitly published.
    AfterPublished,
    #[default]
    Visible,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Hidden => "hidden",
            Visibility::AfterDueDate => "after_due_date",
            Visibility::AfterPublished => "after_published",
            Visibility::Visible => "visible",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order of a leaderboard column.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardOrder {
    Asc,
    Desc,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LeaderboardColumn {
    pub name: String,
    pub order: Option<LeaderboardOrder>,
}

/// Everything a test declares about how it is graded.
///
/// # Defaults
/// - `weight`: `0.0` when undeclared.
/// - `visibility`: undeclared, so the report record omits the field.
/// - `tags`: empty, so the report record omits the field.
/// - `leaderboard`: `None`, the test is graded normally.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct TestMetadata {
    pub weight: Option<f64>,
    pub visibility: Option<Visibility>,
    pub tags: Vec<String>,
    pub leaderboard: Option<LeaderboardColumn>,
}

impl TestMetadata {
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(0.0)
    }

    pub fn is_leaderboard(&self) -> bool {
        self.leaderboard.is_some()
    }
}
