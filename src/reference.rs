//! Reference forward DFT used as ground truth for transform libraries.
//!
//! Every output bin is a direct O(N²) sum accumulated in `f64`, whatever the
//! input and output precision, and narrowed once on store. Multidimensional
//! transforms are composed separably: one pass of the 1-D kernel per axis,
//! fastest axis first, addressing pencils through strided views instead of
//! transposing the data.
//!
//! ```
//! use dftcheck::num::Complex64;
//! use dftcheck::reference::forward_dft;
//!
//! let input = [1.0f64, 1.0, 1.0, 1.0];
//! let mut output = [Complex64::zero(); 4];
//! forward_dft(&input, &mut output, 1).unwrap();
//! assert!((output[0].re - 4.0).abs() < 1e-12);
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::num::{Complex, Complex64, Float};

/// Largest number of axes accepted by [`forward_dft`].
pub const MAX_DIMENSIONS: usize = 3;

/// Contract violations reported by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceError {
    /// A transform of length zero was requested.
    EmptyInput,
    /// Input and output do not hold the same number of elements.
    MismatchedLengths,
    /// The dimension count is outside `1..=MAX_DIMENSIONS`.
    UnsupportedDimensions(usize),
    /// `len` is not `side^dimensions` for any integer side.
    NotPerfectPower { len: usize, dimensions: usize },
    /// A shape or index computation overflowed `usize`.
    Overflow,
    /// A strided view would address past the end of its backing slice.
    ViewOutOfBounds,
}

impl core::fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReferenceError::EmptyInput => write!(f, "transform length must be non-zero"),
            ReferenceError::MismatchedLengths => {
                write!(f, "input and output lengths differ")
            }
            ReferenceError::UnsupportedDimensions(d) => write!(
                f,
                "unsupported dimension count {d} (expected 1..={MAX_DIMENSIONS})"
            ),
            ReferenceError::NotPerfectPower { len, dimensions } => {
                write!(f, "length {len} is not a perfect power of degree {dimensions}")
            }
            ReferenceError::Overflow => write!(f, "shape size overflows usize"),
            ReferenceError::ViewOutOfBounds => {
                write!(f, "strided view exceeds its backing slice")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReferenceError {}

/// A sample the oracle can consume.
pub trait DftInput: Copy {
    /// Contribution `x · e^{-iθ}` of this sample, given `cos θ` and `sin θ`.
    fn twiddled(self, cos: f64, sin: f64) -> Complex64;
}

impl DftInput for f32 {
    #[inline(always)]
    fn twiddled(self, cos: f64, sin: f64) -> Complex64 {
        let x = self as f64;
        Complex64::new(x * cos, -x * sin)
    }
}

impl DftInput for f64 {
    #[inline(always)]
    fn twiddled(self, cos: f64, sin: f64) -> Complex64 {
        Complex64::new(self * cos, -self * sin)
    }
}

impl<T: Float> DftInput for Complex<T> {
    #[inline(always)]
    fn twiddled(self, cos: f64, sin: f64) -> Complex64 {
        self.to_c64() * Complex64::new(cos, -sin)
    }
}

/// A complex element the oracle can store its result into.
pub trait DftOutput: Copy {
    fn from_accumulator(acc: Complex64) -> Self;
}

impl<T: Float> DftOutput for Complex<T> {
    #[inline(always)]
    fn from_accumulator(acc: Complex64) -> Self {
        Complex::from_c64(acc)
    }
}

/// Cubic transform shape: `side` samples along each of `dimensions` axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    side: usize,
    dimensions: usize,
    len: usize,
}

impl Shape {
    pub fn cubic(side: usize, dimensions: usize) -> Result<Self, ReferenceError> {
        if dimensions == 0 || dimensions > MAX_DIMENSIONS {
            return Err(ReferenceError::UnsupportedDimensions(dimensions));
        }
        if side == 0 {
            return Err(ReferenceError::EmptyInput);
        }
        let len = side
            .checked_pow(dimensions as u32)
            .ok_or(ReferenceError::Overflow)?;
        // n*k is formed as an integer product in the kernel
        side.checked_mul(side).ok_or(ReferenceError::Overflow)?;
        Ok(Self {
            side,
            dimensions,
            len,
        })
    }

    /// Recover the shape of a `len`-element buffer from its rounded
    /// `dimensions`-th root.
    pub fn infer(len: usize, dimensions: usize) -> Result<Self, ReferenceError> {
        if dimensions == 0 || dimensions > MAX_DIMENSIONS {
            return Err(ReferenceError::UnsupportedDimensions(dimensions));
        }
        if len == 0 {
            return Err(ReferenceError::EmptyInput);
        }
        let root = libm::round(libm::pow(len as f64, 1.0 / dimensions as f64)) as usize;
        let shape = Self::cubic(root.max(1), dimensions)?;
        if shape.len != len {
            return Err(ReferenceError::NotPerfectPower { len, dimensions });
        }
        Ok(shape)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Total number of elements, `side^dimensions`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element step between neighbours along `axis` (0 is the slowest axis).
    ///
    /// `None` when `axis` is not an axis of this shape.
    pub fn axis_stride(&self, axis: usize) -> Option<usize> {
        let exponent = (self.dimensions - 1).checked_sub(axis)?;
        Some(self.side.pow(exponent as u32))
    }

    /// Linear offsets of the first element of every pencil along `axis`.
    pub fn pencil_starts(&self, axis: usize) -> Option<impl Iterator<Item = usize>> {
        let stride = self.axis_stride(axis)?;
        let block = stride * self.side;
        let blocks = self.len / block;
        Some((0..blocks).flat_map(move |outer| (0..stride).map(move |inner| outer * block + inner)))
    }
}

/// Read-only window of `len` elements spaced `stride` apart, starting at `offset`.
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a, T> {
    data: &'a [T],
    offset: usize,
    stride: usize,
    len: usize,
}

fn last_index(offset: usize, stride: usize, len: usize) -> Result<usize, ReferenceError> {
    if len == 0 {
        return Ok(offset);
    }
    (len - 1)
        .checked_mul(stride)
        .and_then(|span| span.checked_add(offset))
        .ok_or(ReferenceError::Overflow)
}

impl<'a, T: Copy> StridedView<'a, T> {
    pub fn new(
        data: &'a [T],
        offset: usize,
        stride: usize,
        len: usize,
    ) -> Result<Self, ReferenceError> {
        let last = last_index(offset, stride, len)?;
        if len > 0 && last >= data.len() {
            return Err(ReferenceError::ViewOutOfBounds);
        }
        Ok(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    /// The whole slice with unit stride.
    pub fn contiguous(data: &'a [T]) -> Self {
        Self {
            data,
            offset: 0,
            stride: 1,
            len: data.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element `index` of the window, `None` past its end.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len {
            Some(self.data[self.offset + index * self.stride])
        } else {
            None
        }
    }

    /// Elements of the window in order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(move |i| self.data[self.offset + i * self.stride])
    }
}

/// Writable counterpart of [`StridedView`].
#[derive(Debug)]
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a, T: Copy> StridedViewMut<'a, T> {
    pub fn new(
        data: &'a mut [T],
        offset: usize,
        stride: usize,
        len: usize,
    ) -> Result<Self, ReferenceError> {
        let last = last_index(offset, stride, len)?;
        if len > 0 && last >= data.len() {
            return Err(ReferenceError::ViewOutOfBounds);
        }
        Ok(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    pub fn contiguous(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            data,
            offset: 0,
            stride: 1,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len {
            Some(self.data[self.offset + index * self.stride])
        } else {
            None
        }
    }

    /// Write element `index` of the window; indices past its end are rejected.
    #[inline(always)]
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ReferenceError> {
        if index >= self.len {
            return Err(ReferenceError::ViewOutOfBounds);
        }
        self.data[self.offset + index * self.stride] = value;
        Ok(())
    }
}

/// Direct 1-D forward DFT of a strided input into a strided output.
///
/// `X[k] = Σ x[n]·e^{-2πi·nk/N}`, accumulated in `f64` and narrowed on
/// store. Every output element is written; none is read.
pub fn forward_dft_1d<I: DftInput, O: DftOutput>(
    input: &StridedView<'_, I>,
    output: &mut StridedViewMut<'_, O>,
) -> Result<(), ReferenceError> {
    let n = input.len();
    if n == 0 {
        return Err(ReferenceError::EmptyInput);
    }
    if output.len() != n {
        return Err(ReferenceError::MismatchedLengths);
    }
    n.checked_mul(n).ok_or(ReferenceError::Overflow)?;
    let two_pi = 2.0 * PI;
    let len = n as f64;
    for k in 0..n {
        let mut acc = Complex64::zero();
        for (j, x) in input.iter().enumerate() {
            let theta = (j * k) as f64 * two_pi / len;
            acc += x.twiddled(libm::cos(theta), libm::sin(theta));
        }
        output.set(k, O::from_accumulator(acc))?;
    }
    Ok(())
}

/// Run the 1-D kernel over every pencil of `axis`.
fn transform_axis<I: DftInput, O: DftOutput>(
    input: &[I],
    output: &mut [O],
    shape: Shape,
    axis: usize,
) -> Result<(), ReferenceError> {
    let stride = shape
        .axis_stride(axis)
        .ok_or(ReferenceError::UnsupportedDimensions(shape.dimensions()))?;
    let starts = shape
        .pencil_starts(axis)
        .ok_or(ReferenceError::UnsupportedDimensions(shape.dimensions()))?;
    log::trace!(
        "reference pass: axis {axis} of {}, side {}, stride {stride}",
        shape.dimensions(),
        shape.side()
    );
    for start in starts {
        let src = StridedView::new(input, start, stride, shape.side())?;
        let mut dst = StridedViewMut::new(output, start, stride, shape.side())?;
        forward_dft_1d(&src, &mut dst)?;
    }
    Ok(())
}

/// Forward DFT of a cubic `shape`, composed one axis at a time.
///
/// The first pass reads `input`, intermediate passes go through full-size
/// double-precision scratch buffers, and the final pass writes `output`.
pub fn forward_dft_shaped<I: DftInput, O: DftOutput>(
    input: &[I],
    output: &mut [O],
    shape: Shape,
) -> Result<(), ReferenceError> {
    if input.len() != output.len() {
        return Err(ReferenceError::MismatchedLengths);
    }
    if output.len() != shape.len() {
        return Err(ReferenceError::NotPerfectPower {
            len: output.len(),
            dimensions: shape.dimensions(),
        });
    }
    let last = shape.dimensions() - 1;
    if last == 0 {
        return transform_axis(input, output, shape, 0);
    }
    let mut current = vec![Complex64::zero(); shape.len()];
    transform_axis(input, &mut current, shape, last)?;
    for axis in (1..last).rev() {
        let mut next = vec![Complex64::zero(); shape.len()];
        transform_axis(&current, &mut next, shape, axis)?;
        current = next;
    }
    transform_axis(&current, output, shape, 0)
}

/// Forward DFT of a row-major `side^dimensions` buffer.
///
/// The side length is inferred from `output.len()`; lengths that are not a
/// perfect power, mismatched buffers and dimension counts outside
/// `1..=3` are reported as errors.
pub fn forward_dft<I: DftInput, O: DftOutput>(
    input: &[I],
    output: &mut [O],
    dimensions: usize,
) -> Result<(), ReferenceError> {
    let shape = Shape::infer(output.len(), dimensions)?;
    forward_dft_shaped(input, output, shape)
}

/// Convenience wrapper returning a freshly allocated double-precision result.
pub fn forward_dft_vec<I: DftInput>(
    input: &[I],
    dimensions: usize,
) -> Result<Vec<Complex64>, ReferenceError> {
    let mut output = vec![Complex64::zero(); input.len()];
    forward_dft(input, &mut output, dimensions)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Complex32;

    #[test]
    fn single_sample_is_identity() {
        let input = [Complex64::new(2.5, -1.25)];
        let mut output = [Complex64::zero(); 1];
        forward_dft(&input, &mut output, 1).unwrap();
        assert_eq!(output[0], input[0]);
    }

    #[test]
    fn pencil_starts_cover_each_axis() {
        let shape = Shape::cubic(3, 3).unwrap();
        let fast: Vec<usize> = shape.pencil_starts(2).unwrap().collect();
        assert_eq!(fast, (0..9).map(|i| i * 3).collect::<Vec<_>>());
        let middle: Vec<usize> = shape.pencil_starts(1).unwrap().collect();
        assert_eq!(middle, [0, 1, 2, 9, 10, 11, 18, 19, 20]);
        let slow: Vec<usize> = shape.pencil_starts(0).unwrap().collect();
        assert_eq!(slow, (0..9).collect::<Vec<_>>());
        assert_eq!(shape.axis_stride(0), Some(9));
    }

    #[test]
    fn axes_past_the_shape_are_rejected() {
        let shape = Shape::cubic(4, 2).unwrap();
        assert_eq!(shape.axis_stride(1), Some(1));
        assert_eq!(shape.axis_stride(2), None);
        assert_eq!(shape.axis_stride(usize::MAX), None);
        assert!(shape.pencil_starts(2).is_none());
    }

    #[test]
    fn infer_rounds_to_nearest_root() {
        assert_eq!(Shape::infer(32 * 32 * 32, 3).unwrap().side(), 32);
        assert_eq!(Shape::infer(21 * 21, 2).unwrap().side(), 21);
        assert_eq!(
            Shape::infer(30, 2),
            Err(ReferenceError::NotPerfectPower {
                len: 30,
                dimensions: 2
            })
        );
    }

    #[test]
    fn strided_kernel_reads_embedded_column() {
        // column 1 of a 3x3 row-major grid
        let grid: Vec<Complex32> = (0..9).map(|i| Complex32::new(i as f32, 0.0)).collect();
        let column = StridedView::new(&grid, 1, 3, 3).unwrap();
        let mut out = vec![Complex64::zero(); 3];
        forward_dft_1d(&column, &mut StridedViewMut::contiguous(&mut out)).unwrap();
        assert!((out[0].re - 12.0).abs() < 1e-12);
        assert!(out[0].im.abs() < 1e-12);
    }

    #[test]
    fn view_bounds_are_checked() {
        let data = [0.0f64; 4];
        assert!(StridedView::new(&data, 1, 2, 2).is_ok());
        assert_eq!(
            StridedView::new(&data, 1, 2, 3).unwrap_err(),
            ReferenceError::ViewOutOfBounds
        );
        assert_eq!(
            StridedView::new(&data, 0, usize::MAX, 3).unwrap_err(),
            ReferenceError::Overflow
        );
    }

    #[test]
    fn access_stays_inside_the_window() {
        let grid: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let column = StridedView::new(&grid, 0, 3, 2).unwrap();
        assert_eq!(column.get(1), Some(3.0));
        assert_eq!(column.get(2), None);
        assert_eq!(column.iter().collect::<Vec<_>>(), [0.0, 3.0]);

        let mut backing = grid.clone();
        let mut view = StridedViewMut::new(&mut backing, 1, 3, 2).unwrap();
        view.set(1, -1.0).unwrap();
        assert_eq!(view.get(1), Some(-1.0));
        assert_eq!(view.get(2), None);
        assert_eq!(view.set(2, -2.0), Err(ReferenceError::ViewOutOfBounds));
        assert_eq!(backing[4], -1.0);
        assert_eq!(backing[7], 7.0);
    }
}
