#[cfg(test)]
use crate::engine::{ResultState, TestResult};

/// Result sink with nothing but the standard bookkeeping.
#[cfg(test)]
pub struct PlainResult(pub ResultState);

#[cfg(test)]
impl TestResult for PlainResult {
    fn state(&self) -> &ResultState {
        &self.0
    }

    fn state_mut(&mut self) -> &mut ResultState {
        &mut self.0
    }
}
