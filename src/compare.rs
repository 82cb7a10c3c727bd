//! Element-wise closeness checks between a library result and the oracle.
//!
//! The bound for a vector of `len` elements of type `T` is
//! `error_margin · components · ε(T) · max(1, log2 len)`. Every element of
//! a vector is judged against one scale, the largest expected magnitude in
//! the vector but never less than one: it passes when its absolute error is
//! at most `bound · scale`.

use alloc::vec::Vec;

use crate::num::{Complex, Complex64, Float};

/// Error margin used by the compute tests.
pub const DEFAULT_ERROR_MARGIN: u32 = 10;

/// Mismatches recorded in detail per comparison.
pub const MAX_REPORTED_MISMATCHES: usize = 8;

/// One element outside tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub index: usize,
    pub actual: Complex64,
    pub expected: Complex64,
    pub abs_error: f64,
}

/// Outcome of comparing two vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub actual_len: usize,
    pub expected_len: usize,
    pub bound: f64,
    pub max_abs_error: f64,
    pub mismatch_count: usize,
    /// First [`MAX_REPORTED_MISMATCHES`] mismatches.
    pub mismatches: Vec<Mismatch>,
}

impl Comparison {
    pub fn is_ok(&self) -> bool {
        self.actual_len == self.expected_len && self.mismatch_count == 0
    }
}

impl core::fmt::Display for Comparison {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.actual_len != self.expected_len {
            return write!(
                f,
                "length mismatch: {} elements, expected {}",
                self.actual_len, self.expected_len
            );
        }
        if self.mismatch_count == 0 {
            return write!(
                f,
                "{} elements within {:.3e} (max error {:.3e})",
                self.expected_len, self.bound, self.max_abs_error
            );
        }
        write!(
            f,
            "{} of {} elements outside {:.3e} (max error {:.3e})",
            self.mismatch_count, self.expected_len, self.bound, self.max_abs_error
        )?;
        for m in &self.mismatches {
            write!(
                f,
                "; [{}] got ({:e}, {:e}) expected ({:e}, {:e})",
                m.index, m.actual.re, m.actual.im, m.expected.re, m.expected.im
            )?;
        }
        Ok(())
    }
}

/// Relative tolerance for `len` values of `T` with `components` parts each.
pub fn tolerance<T: Float>(len: usize, components: usize, error_margin: u32) -> f64 {
    let growth = if len > 1 {
        libm::log2(len as f64).max(1.0)
    } else {
        1.0
    };
    error_margin as f64 * components as f64 * T::epsilon() * growth
}

/// Whether a single value is within `bound` of `expected`, relative to
/// `floor` or to `|expected|` when that is larger.
pub fn check_equal<T: Float>(
    actual: Complex<T>,
    expected: Complex<T>,
    bound: f64,
    floor: f64,
) -> bool {
    let a = actual.to_c64();
    let e = expected.to_c64();
    let err = (a - e).abs();
    err.is_finite() && err <= bound * floor.max(e.abs())
}

fn compare<T: Float>(
    actual: &[Complex<T>],
    expected: &[Complex<T>],
    components: usize,
    error_margin: u32,
) -> Comparison {
    let bound = tolerance::<T>(expected.len(), components, error_margin);
    let mut result = Comparison {
        actual_len: actual.len(),
        expected_len: expected.len(),
        bound,
        max_abs_error: 0.0,
        mismatch_count: 0,
        mismatches: Vec::new(),
    };
    if actual.len() != expected.len() {
        return result;
    }
    let floor = expected
        .iter()
        .map(|e| e.to_c64().abs())
        .fold(1.0f64, f64::max);
    for (index, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let err = (a.to_c64() - e.to_c64()).abs();
        if err > result.max_abs_error || !err.is_finite() {
            result.max_abs_error = err;
        }
        if !check_equal(a, e, bound, floor) {
            result.mismatch_count += 1;
            if result.mismatches.len() < MAX_REPORTED_MISMATCHES {
                result.mismatches.push(Mismatch {
                    index,
                    actual: a.to_c64(),
                    expected: e.to_c64(),
                    abs_error: err,
                });
            }
        }
    }
    result
}

/// Compare complex vectors element-wise.
pub fn check_equal_vector<T: Float>(
    actual: &[Complex<T>],
    expected: &[Complex<T>],
    error_margin: u32,
) -> Comparison {
    compare(actual, expected, 2, error_margin)
}

/// Compare real vectors element-wise.
pub fn check_equal_real_vector<T: Float>(
    actual: &[T],
    expected: &[T],
    error_margin: u32,
) -> Comparison {
    let a: Vec<Complex<T>> = actual.iter().map(|&x| Complex::from_real(x)).collect();
    let e: Vec<Complex<T>> = expected.iter().map(|&x| Complex::from_real(x)).collect();
    compare(&a, &e, 1, error_margin)
}
