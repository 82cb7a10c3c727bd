use std::fmt;
use std::time::{Duration, Instant};

use super::{enumerate_cases, run_case, HarnessError, TestCase, TestOutcome};
use crate::backend::DftBackend;
use crate::config::HarnessConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub case: TestCase,
    pub outcome: TestOutcome,
    pub elapsed: Duration,
}

/// Outcomes of a suite run, in case order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteReport {
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Sum of per-case run times.
    pub fn elapsed(&self) -> Duration {
        self.results.iter().map(|r| r.elapsed).sum()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cases: {} passed, {} skipped, {} failed",
            self.results.len(),
            self.passed(),
            self.skipped(),
            self.failed()
        )
    }
}

/// The case matrix of a [`HarnessConfig`], optionally filtered.
#[derive(Debug, Clone)]
pub struct Suite {
    config: HarnessConfig,
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let cases = enumerate_cases(&config);
        Ok(Self { config, cases })
    }

    /// Keep only cases whose `NAME/size` label contains `pattern`.
    pub fn filter(mut self, pattern: &str) -> Self {
        self.cases.retain(|case| case.to_string().contains(pattern));
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    fn run_one<B: DftBackend>(&self, backend: &B, case: &TestCase) -> CaseResult {
        let start = Instant::now();
        let outcome = match run_case(backend, case, self.config.seed, self.config.error_margin) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("{case}: {e}");
                TestOutcome::Failed(vec![e.to_string()])
            }
        };
        CaseResult {
            case: *case,
            outcome,
            elapsed: start.elapsed(),
        }
    }

    #[cfg(feature = "parallel")]
    fn run_cases<B: DftBackend>(&self, backend: &B) -> Result<Vec<CaseResult>, HarnessError> {
        use rayon::prelude::*;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map_err(|e| HarnessError::ThreadPool(e.to_string()))?;
        Ok(pool.install(|| {
            self.cases
                .par_iter()
                .map(|case| self.run_one(backend, case))
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn run_cases<B: DftBackend>(&self, backend: &B) -> Result<Vec<CaseResult>, HarnessError> {
        Ok(self
            .cases
            .iter()
            .map(|case| self.run_one(backend, case))
            .collect())
    }

    /// Run every case against `backend`.
    pub fn run<B: DftBackend>(&self, backend: &B) -> Result<SuiteReport, HarnessError> {
        let device = backend.device();
        log::info!("running {} cases on {}", self.cases.len(), device.name);
        let report = SuiteReport {
            results: self.run_cases(backend)?,
        };
        log::info!("{report} in {:?}", report.elapsed());
        Ok(report)
    }
}
