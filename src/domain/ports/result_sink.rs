//! Result sink port.

use crate::domain::models::assertion_result::AssertionResult;

/// Receives assertion results in evaluation order.
pub trait ResultSink {
    /// Accepts one result.
    fn record(&mut self, result: &AssertionResult);
}

impl ResultSink for Vec<AssertionResult> {
    fn record(&mut self, result: &AssertionResult) {
        self.push(result.clone());
    }
}
