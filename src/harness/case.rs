use std::fmt;

use crate::backend::{DeviceInfo, Storage};
use crate::config::HarnessConfig;
use crate::descriptor::{ComplexStorage, Domain, Placement, Precision};

/// One parametrization of the compute tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestCase {
    pub precision: Precision,
    pub domain: Domain,
    pub dimensions: usize,
    pub size: usize,
    pub placement: Placement,
    pub layout: ComplexStorage,
    pub storage: Storage,
}

impl TestCase {
    /// Name of the test this case belongs to, e.g.
    /// `REAL_SINGLE_2D_in_place_buffer` or
    /// `COMPLEX_DOUBLE_1D_out_of_place_real_real_USM`.
    pub fn name(&self) -> String {
        let layout = match self.layout {
            ComplexStorage::Interleaved => "",
            ComplexStorage::RealReal => "real_real_",
        };
        format!(
            "{}_{}_{}D_{}_{}{}",
            self.domain.name(),
            self.precision.name(),
            self.dimensions,
            self.placement.name(),
            layout,
            self.storage.name()
        )
    }

    /// Lengths of the transform: `size` along every axis.
    pub fn lengths(&self) -> Vec<usize> {
        vec![self.size; self.dimensions]
    }

    /// Number of samples, `size^dimensions`.
    pub fn total_len(&self) -> usize {
        self.size.pow(self.dimensions as u32)
    }

    /// Why this case cannot run on `device`, if it cannot.
    pub fn skip_reason(&self, device: &DeviceInfo) -> Option<String> {
        if self.precision == Precision::Double && !device.supports_fp64 {
            return Some(format!("{} does not support double precision", device.name));
        }
        if self.storage == Storage::Usm && !device.supports_shared_usm {
            return Some(format!(
                "{} does not support shared USM allocations",
                device.name
            ));
        }
        if self.domain == Domain::Real
            && self.placement == Placement::InPlace
            && self.layout == ComplexStorage::RealReal
        {
            return Some(String::from(
                "real_real layout is not defined for in-place real transforms",
            ));
        }
        None
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name(), self.size)
    }
}

/// Every combination selected by `config`, grouped by test name with the
/// sizes innermost.
pub fn enumerate_cases(config: &HarnessConfig) -> Vec<TestCase> {
    let mut cases = Vec::new();
    for precision in [Precision::Single, Precision::Double] {
        for domain in [Domain::Real, Domain::Complex] {
            for &dimensions in &config.dimensions {
                for placement in [Placement::InPlace, Placement::OutOfPlace] {
                    for layout in [ComplexStorage::Interleaved, ComplexStorage::RealReal] {
                        for storage in [Storage::Buffer, Storage::Usm] {
                            for &size in &config.sizes {
                                cases.push(TestCase {
                                    precision,
                                    domain,
                                    dimensions,
                                    size,
                                    placement,
                                    layout,
                                    storage,
                                });
                            }
                        }
                    }
                }
            }
        }
    }
    cases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_test_instantiation() {
        let case = TestCase {
            precision: Precision::Single,
            domain: Domain::Real,
            dimensions: 2,
            size: 8,
            placement: Placement::InPlace,
            layout: ComplexStorage::Interleaved,
            storage: Storage::Buffer,
        };
        assert_eq!(case.name(), "REAL_SINGLE_2D_in_place_buffer");
        assert_eq!(case.to_string(), "REAL_SINGLE_2D_in_place_buffer/8");
        let case = TestCase {
            precision: Precision::Double,
            domain: Domain::Complex,
            dimensions: 3,
            placement: Placement::OutOfPlace,
            layout: ComplexStorage::RealReal,
            storage: Storage::Usm,
            ..case
        };
        assert_eq!(case.name(), "COMPLEX_DOUBLE_3D_out_of_place_real_real_USM");
        assert_eq!(case.total_len(), 512);
    }

    #[test]
    fn skip_rules() {
        let mut device = DeviceInfo::host("test");
        let case = TestCase {
            precision: Precision::Double,
            domain: Domain::Real,
            dimensions: 1,
            size: 8,
            placement: Placement::InPlace,
            layout: ComplexStorage::Interleaved,
            storage: Storage::Usm,
        };
        assert_eq!(case.skip_reason(&device), None);
        device.supports_shared_usm = false;
        assert!(case.skip_reason(&device).unwrap().contains("USM"));
        device.supports_fp64 = false;
        assert!(case.skip_reason(&device).unwrap().contains("double"));
        let split = TestCase {
            precision: Precision::Single,
            layout: ComplexStorage::RealReal,
            storage: Storage::Buffer,
            ..case
        };
        assert!(split.skip_reason(&device).is_some());
        let complex = TestCase {
            domain: Domain::Complex,
            ..split
        };
        assert_eq!(complex.skip_reason(&device), None);
    }

    #[test]
    fn default_matrix_size() {
        let config = HarnessConfig {
            threads: 1,
            ..HarnessConfig::default()
        };
        let cases = enumerate_cases(&config);
        // 2 precisions, 2 domains, 3 ranks, 2 placements, 2 layouts, 2 storages, 3 sizes
        assert_eq!(cases.len(), 2 * 2 * 3 * 2 * 2 * 2 * 3);
        assert_eq!(cases[0].size, 8);
        assert_eq!(cases[2].size, 32);
    }
}
