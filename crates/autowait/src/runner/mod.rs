// Test runner
//
// Suites of async tests with before_each/after_each hooks, per-test and
// run-wide timeouts, soft assertion bookkeeping and parallel workers.

pub mod report;
pub mod suite;
pub mod test_info;
pub mod test_runner;

pub use report::{RunReport, TestResult, TestStatus};
pub use suite::{Fixtures, Suite};
pub use test_info::TestInfo;
pub use test_runner::TestRunner;
