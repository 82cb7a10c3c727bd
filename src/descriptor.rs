//! Transform configuration handed to a DFT library.

use alloc::vec::Vec;

use crate::layout::{conjugate_even_extents, Side, Strides};
use crate::reference::MAX_DIMENSIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

impl Precision {
    pub fn name(self) -> &'static str {
        match self {
            Precision::Single => "SINGLE",
            Precision::Double => "DOUBLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Real input, conjugate-even complex output.
    Real,
    Complex,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Real => "REAL",
            Domain::Complex => "COMPLEX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    InPlace,
    #[default]
    OutOfPlace,
}

impl Placement {
    pub fn name(self) -> &'static str {
        match self {
            Placement::InPlace => "in_place",
            Placement::OutOfPlace => "out_of_place",
        }
    }
}

/// How complex values are laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComplexStorage {
    /// `[re, im]` pairs in one buffer.
    #[default]
    Interleaved,
    /// Separate real and imaginary buffers.
    RealReal,
}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorError {
    InvalidRank(usize),
    ZeroLength { axis: usize },
    StrideRank { expected: usize, actual: usize },
    InvalidScale(f64),
}

impl core::fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DescriptorError::InvalidRank(r) => {
                write!(f, "rank {r} outside 1..={MAX_DIMENSIONS}")
            }
            DescriptorError::ZeroLength { axis } => write!(f, "axis {axis} has zero length"),
            DescriptorError::StrideRank { expected, actual } => write!(
                f,
                "stride vector has {actual} entries, expected {expected}"
            ),
            DescriptorError::InvalidScale(s) => write!(f, "scale {s} must be finite and non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DescriptorError {}

/// Configuration of a single transform.
///
/// Input and output strides apply to whichever direction the descriptor
/// is used for, so a backward descriptor of a real transform carries the
/// complex strides as its input strides.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    precision: Precision,
    domain: Domain,
    lengths: Vec<usize>,
    placement: Placement,
    complex_storage: ComplexStorage,
    input_strides: Strides,
    output_strides: Strides,
    forward_scale: f64,
    backward_scale: f64,
}

impl Descriptor {
    /// Descriptor with dense row-major strides and unit scales.
    pub fn new(precision: Precision, domain: Domain, lengths: Vec<usize>) -> Self {
        let full = Strides::row_major(&lengths);
        let output = match domain {
            Domain::Real => Strides::row_major(&conjugate_even_extents(&lengths)),
            Domain::Complex => full.clone(),
        };
        Self {
            precision,
            domain,
            lengths,
            placement: Placement::default(),
            complex_storage: ComplexStorage::default(),
            input_strides: full,
            output_strides: output,
            forward_scale: 1.0,
            backward_scale: 1.0,
        }
    }

    /// Descriptor for a `size^dimensions` transform.
    pub fn cubic(precision: Precision, domain: Domain, size: usize, dimensions: usize) -> Self {
        Self::new(precision, domain, alloc::vec![size; dimensions])
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_complex_storage(mut self, storage: ComplexStorage) -> Self {
        self.complex_storage = storage;
        self
    }

    pub fn with_input_strides(mut self, strides: Strides) -> Self {
        self.input_strides = strides;
        self
    }

    pub fn with_output_strides(mut self, strides: Strides) -> Self {
        self.output_strides = strides;
        self
    }

    pub fn with_forward_scale(mut self, scale: f64) -> Self {
        self.forward_scale = scale;
        self
    }

    pub fn with_backward_scale(mut self, scale: f64) -> Self {
        self.backward_scale = scale;
        self
    }

    /// Validate the configuration before it is used for computation.
    pub fn commit(&self) -> Result<(), DescriptorError> {
        let rank = self.lengths.len();
        if rank == 0 || rank > MAX_DIMENSIONS {
            return Err(DescriptorError::InvalidRank(rank));
        }
        if let Some(axis) = self.lengths.iter().position(|&l| l == 0) {
            return Err(DescriptorError::ZeroLength { axis });
        }
        for strides in [&self.input_strides, &self.output_strides] {
            if strides.rank() != rank {
                return Err(DescriptorError::StrideRank {
                    expected: rank + 1,
                    actual: strides.rank() + 1,
                });
            }
        }
        for scale in [self.forward_scale, self.backward_scale] {
            if !scale.is_finite() || scale == 0.0 {
                return Err(DescriptorError::InvalidScale(scale));
            }
        }
        Ok(())
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn complex_storage(&self) -> ComplexStorage {
        self.complex_storage
    }

    pub fn input_strides(&self) -> &Strides {
        &self.input_strides
    }

    pub fn output_strides(&self) -> &Strides {
        &self.output_strides
    }

    pub fn forward_scale(&self) -> f64 {
        self.forward_scale
    }

    pub fn backward_scale(&self) -> f64 {
        self.backward_scale
    }

    pub fn scale(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Forward => self.forward_scale,
            Direction::Backward => self.backward_scale,
        }
    }

    /// Total number of samples, the product of the lengths.
    pub fn total_len(&self) -> usize {
        self.lengths.iter().product()
    }

    /// Input and output sides of a transform in `direction`.
    pub fn sides(&self, direction: Direction) -> (Side, Side) {
        match (self.domain, direction) {
            (Domain::Complex, _) => (Side::Complex, Side::Complex),
            (Domain::Real, Direction::Forward) => (Side::Real, Side::Complex),
            (Domain::Real, Direction::Backward) => (Side::Complex, Side::Real),
        }
    }

    /// Logical extents of the data held on `side`.
    pub fn extents(&self, side: Side) -> Vec<usize> {
        match (self.domain, side) {
            (Domain::Real, Side::Complex) => conjugate_even_extents(&self.lengths),
            _ => self.lengths.clone(),
        }
    }
}
