//! Compute tests that drive a [`DftBackend`](crate::backend::DftBackend)
//! through every case of the test matrix and check it against the oracle.
//!
//! ```
//! use dftcheck::backend::DirectBackend;
//! use dftcheck::config::HarnessConfig;
//! use dftcheck::harness::Suite;
//!
//! let config = HarnessConfig {
//!     sizes: vec![4],
//!     dimensions: vec![1],
//!     ..HarnessConfig::default()
//! };
//! let report = Suite::new(config).unwrap().run(&DirectBackend::new()).unwrap();
//! assert_eq!(report.failed(), 0);
//! ```

mod case;
mod driver;
mod suite;

pub use case::{enumerate_cases, TestCase};
pub use driver::{run_case, DftTest, Signal, TestOutcome};
pub use suite::{CaseResult, Suite, SuiteReport};

use crate::config::ConfigError;
use crate::descriptor::Precision;
use crate::layout::LayoutError;
use crate::reference::ReferenceError;

/// Failures of the harness itself, as opposed to the backend under test.
#[derive(Debug, Clone, PartialEq)]
pub enum HarnessError {
    Config(ConfigError),
    Reference(ReferenceError),
    Layout(LayoutError),
    PrecisionMismatch { case: Precision, data: Precision },
    ThreadPool(String),
}

impl core::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HarnessError::Config(e) => write!(f, "configuration: {e}"),
            HarnessError::Reference(e) => write!(f, "reference transform: {e}"),
            HarnessError::Layout(e) => write!(f, "container layout: {e}"),
            HarnessError::PrecisionMismatch { case, data } => write!(
                f,
                "{} case run with {} data",
                case.name(),
                data.name()
            ),
            HarnessError::ThreadPool(e) => write!(f, "thread pool: {e}"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<ConfigError> for HarnessError {
    fn from(e: ConfigError) -> Self {
        HarnessError::Config(e)
    }
}

impl From<ReferenceError> for HarnessError {
    fn from(e: ReferenceError) -> Self {
        HarnessError::Reference(e)
    }
}

impl From<LayoutError> for HarnessError {
    fn from(e: LayoutError) -> Self {
        HarnessError::Layout(e)
    }
}
