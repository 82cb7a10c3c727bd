//! Harness configuration with environment overrides.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `DFTCHECK_SIZES` | comma-separated transform sizes | `8,21,32` |
//! | `DFTCHECK_DIMENSIONS` | comma-separated dimension counts | `1,2,3` |
//! | `DFTCHECK_ERROR_MARGIN` | comparison error margin | `10` |
//! | `DFTCHECK_SEED` | input generator seed | `1` |
//! | `DFTCHECK_THREADS` | worker threads for the `parallel` feature | CPU count |
//!
//! Unparsable values are reported as errors rather than replaced by the
//! defaults.

use crate::compare::DEFAULT_ERROR_MARGIN;
use crate::reference::MAX_DIMENSIONS;

pub const SIZES_VAR: &str = "DFTCHECK_SIZES";
pub const DIMENSIONS_VAR: &str = "DFTCHECK_DIMENSIONS";
pub const ERROR_MARGIN_VAR: &str = "DFTCHECK_ERROR_MARGIN";
pub const SEED_VAR: &str = "DFTCHECK_SEED";
pub const THREADS_VAR: &str = "DFTCHECK_THREADS";

/// Transform sizes exercised by default.
pub const DEFAULT_SIZES: [usize; 3] = [8, 21, 32];
/// Seed of the input generator.
pub const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, value: String },
    EmptyList(&'static str),
    ZeroSize,
    UnsupportedDimension(usize),
    ZeroThreads,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidValue { var, value } => {
                write!(f, "invalid value {value:?} for {var}")
            }
            ConfigError::EmptyList(var) => write!(f, "{var} must list at least one value"),
            ConfigError::ZeroSize => write!(f, "transform sizes must be non-zero"),
            ConfigError::UnsupportedDimension(d) => {
                write!(f, "dimension {d} outside 1..={MAX_DIMENSIONS}")
            }
            ConfigError::ZeroThreads => write!(f, "thread count must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub sizes: Vec<usize>,
    pub dimensions: Vec<usize>,
    pub error_margin: u32,
    pub seed: u64,
    pub threads: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            dimensions: (1..=MAX_DIMENSIONS).collect(),
            error_margin: DEFAULT_ERROR_MARGIN,
            seed: DEFAULT_SEED,
            threads: num_cpus::get().max(1),
        }
    }
}

fn parse_scalar<V: core::str::FromStr>(var: &'static str, value: &str) -> Result<V, ConfigError> {
    value.trim().parse::<V>().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

/// Parse a comma-separated list of unsigned integers.
pub fn parse_list(var: &'static str, value: &str) -> Result<Vec<usize>, ConfigError> {
    let items: Vec<usize> = value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse_scalar(var, item))
        .collect::<Result<_, _>>()?;
    if items.is_empty() {
        return Err(ConfigError::EmptyList(var));
    }
    Ok(items)
}

impl HarnessConfig {
    /// Defaults overridden by `DFTCHECK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(SIZES_VAR) {
            cfg.sizes = parse_list(SIZES_VAR, &v)?;
        }
        if let Some(v) = lookup(DIMENSIONS_VAR) {
            cfg.dimensions = parse_list(DIMENSIONS_VAR, &v)?;
        }
        if let Some(v) = lookup(ERROR_MARGIN_VAR) {
            cfg.error_margin = parse_scalar(ERROR_MARGIN_VAR, &v)?;
        }
        if let Some(v) = lookup(SEED_VAR) {
            cfg.seed = parse_scalar(SEED_VAR, &v)?;
        }
        if let Some(v) = lookup(THREADS_VAR) {
            cfg.threads = parse_scalar(THREADS_VAR, &v)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::EmptyList(SIZES_VAR));
        }
        if self.sizes.contains(&0) {
            return Err(ConfigError::ZeroSize);
        }
        if self.dimensions.is_empty() {
            return Err(ConfigError::EmptyList(DIMENSIONS_VAR));
        }
        if let Some(&d) = self
            .dimensions
            .iter()
            .find(|&&d| d == 0 || d > MAX_DIMENSIONS)
        {
            return Err(ConfigError::UnsupportedDimension(d));
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_compute_tests() {
        let cfg = HarnessConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.sizes, [8, 21, 32]);
        assert_eq!(cfg.dimensions, [1, 2, 3]);
        assert_eq!(cfg.error_margin, 10);
        assert_eq!(cfg.seed, 1);
        assert!(cfg.threads >= 1);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = HarnessConfig::from_lookup(lookup(&[
            (SIZES_VAR, "4, 5,"),
            (DIMENSIONS_VAR, "2"),
            (ERROR_MARGIN_VAR, "20"),
            (SEED_VAR, "99"),
            (THREADS_VAR, "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.sizes, [4, 5]);
        assert_eq!(cfg.dimensions, [2]);
        assert_eq!(cfg.error_margin, 20);
        assert_eq!(cfg.seed, 99);
        assert_eq!(cfg.threads, 3);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_eq!(
            HarnessConfig::from_lookup(lookup(&[(SIZES_VAR, "8,x")])),
            Err(ConfigError::InvalidValue {
                var: SIZES_VAR,
                value: "x".to_string()
            })
        );
        assert_eq!(
            HarnessConfig::from_lookup(lookup(&[(DIMENSIONS_VAR, "4")])),
            Err(ConfigError::UnsupportedDimension(4))
        );
        assert_eq!(
            HarnessConfig::from_lookup(lookup(&[(SIZES_VAR, " , ")])),
            Err(ConfigError::EmptyList(SIZES_VAR))
        );
        assert_eq!(
            HarnessConfig::from_lookup(lookup(&[(SIZES_VAR, "0")])),
            Err(ConfigError::ZeroSize)
        );
    }
}
