//! Checks on the files a student submitted.

use log::debug;
use std::path::Path;

/// Directory the submission is unpacked into on the grading machine.
pub const SUBMISSION_BASE: &str = "/autograder/submission";

/// Returns the paths, relative to [`SUBMISSION_BASE`], that are missing from the
/// submission.
///
/// e.g. `check_submitted_files(["src/calculator.rs"])`
pub fn check_submitted_files<I, S>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    check_submitted_files_in(SUBMISSION_BASE, paths)
}

/// Same as [`check_submitted_files`] with any base directory. A path counts as
/// present only if it is a regular file; order of the input is preserved.
pub fn check_submitted_files_in<B, I, S>(base: B, paths: I) -> Vec<String>
where
    B: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let base = base.as_ref();
    let mut missing_files = vec![];
    for path in paths {
        let path: &str = path.as_ref();
        let target = base.join(path);
        if !target.is_file() {
            debug!("Missing submitted file: '{}'", target.display());
            missing_files.push(path.to_string());
        }
    }
    missing_files
}
