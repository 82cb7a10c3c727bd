//! Buffer layouts used when handing data to a transform library.
//!
//! A [`Strides`] value follows the DFT descriptor convention: an offset
//! followed by one stride per axis, counted in elements of the side being
//! addressed (real scalars on the real side, complex values on the complex
//! side). [`gather`] and [`scatter`] move data between such strided
//! containers and dense row-major arrays.

use alloc::vec;
use alloc::vec::Vec;

use crate::num::{Complex, Float};

/// Errors produced while addressing strided containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Stride vector rank does not match the number of extents.
    RankMismatch { strides: usize, extents: usize },
    /// An element offset lies outside the container.
    OutOfBounds { offset: usize, len: usize },
    /// Dense data does not match the product of the extents.
    LengthMismatch { expected: usize, actual: usize },
    /// Offset arithmetic overflowed `usize`.
    Overflow,
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LayoutError::RankMismatch { strides, extents } => write!(
                f,
                "{strides} strides given for a rank-{extents} layout"
            ),
            LayoutError::OutOfBounds { offset, len } => {
                write!(f, "element offset {offset} outside container of {len}")
            }
            LayoutError::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} dense elements, found {actual}")
            }
            LayoutError::Overflow => write!(f, "offset computation overflowed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}

/// Which side of a transform a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Real scalars (input of a real-domain forward transform).
    Real,
    /// Complex values, interleaved or split.
    Complex,
}

/// Offset plus per-axis element strides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Strides {
    offset: usize,
    steps: Vec<usize>,
}

impl Strides {
    pub fn new(offset: usize, steps: Vec<usize>) -> Self {
        Self { offset, steps }
    }

    /// Dense row-major strides for `extents`.
    pub fn row_major(extents: &[usize]) -> Self {
        let mut steps = vec![0; extents.len()];
        let mut step = 1;
        for (axis, &extent) in extents.iter().enumerate().rev() {
            steps[axis] = step;
            step *= extent;
        }
        Self { offset: 0, steps }
    }

    /// Row-major strides whose last axis is padded to `row_len` elements.
    pub fn padded_rows(extents: &[usize], row_len: usize) -> Self {
        let mut padded = extents.to_vec();
        if let Some(last) = padded.last_mut() {
            *last = row_len;
        }
        Self::row_major(&padded)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    pub fn rank(&self) -> usize {
        self.steps.len()
    }

    /// Descriptor form: `[offset, s_1, ..., s_d]`.
    pub fn to_vec(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.steps.len() + 1);
        out.push(self.offset);
        out.extend_from_slice(&self.steps);
        out
    }

    pub fn offset_of(&self, index: &[usize]) -> Result<usize, LayoutError> {
        if index.len() != self.steps.len() {
            return Err(LayoutError::RankMismatch {
                strides: self.steps.len(),
                extents: index.len(),
            });
        }
        let mut offset = self.offset;
        for (&i, &step) in index.iter().zip(self.steps.iter()) {
            offset = i
                .checked_mul(step)
                .and_then(|delta| offset.checked_add(delta))
                .ok_or(LayoutError::Overflow)?;
        }
        Ok(offset)
    }

    /// Number of elements a container needs to hold every addressed element.
    pub fn required_len(&self, extents: &[usize]) -> Result<usize, LayoutError> {
        if extents.iter().any(|&e| e == 0) {
            return Ok(0);
        }
        let last: Vec<usize> = extents.iter().map(|&e| e - 1).collect();
        self.offset_of(&last)?
            .checked_add(1)
            .ok_or(LayoutError::Overflow)
    }
}

/// Number of complex values kept along the last axis of a real transform.
pub fn conjugate_even_len(n: usize) -> usize {
    n / 2 + 1
}

/// Real scalars per padded row of an in-place real transform.
pub fn conjugate_even_size(n: usize) -> usize {
    2 * conjugate_even_len(n)
}

/// Extents of the complex side of a real transform over `extents`.
pub fn conjugate_even_extents(extents: &[usize]) -> Vec<usize> {
    let mut out = extents.to_vec();
    if let Some(last) = out.last_mut() {
        *last = conjugate_even_len(*last);
    }
    out
}

/// Visit every multi-index of `extents` in row-major order.
pub fn for_each_index<F>(extents: &[usize], mut f: F) -> Result<(), LayoutError>
where
    F: FnMut(&[usize], usize) -> Result<(), LayoutError>,
{
    if extents.is_empty() || extents.iter().any(|&e| e == 0) {
        return Ok(());
    }
    let total: usize = extents.iter().product();
    let mut index = vec![0usize; extents.len()];
    for linear in 0..total {
        f(&index, linear)?;
        for axis in (0..extents.len()).rev() {
            index[axis] += 1;
            if index[axis] < extents[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    Ok(())
}

/// Read access to a container as a sequence of complex elements.
#[derive(Debug, Clone, Copy)]
pub enum ElementView<'a, T: Float> {
    /// Real scalars, read with a zero imaginary part.
    Real(&'a [T]),
    /// `[re, im]` pairs.
    Interleaved(&'a [T]),
    /// Separate real and imaginary arrays.
    Split { re: &'a [T], im: &'a [T] },
}

impl<'a, T: Float> ElementView<'a, T> {
    /// View of `primary` (and `secondary` for split complex data) for `side`.
    pub fn for_side(side: Side, split: bool, primary: &'a [T], secondary: &'a [T]) -> Self {
        match (side, split) {
            (Side::Real, _) => ElementView::Real(primary),
            (Side::Complex, false) => ElementView::Interleaved(primary),
            (Side::Complex, true) => ElementView::Split {
                re: primary,
                im: secondary,
            },
        }
    }

    /// Number of addressable elements.
    pub fn len(&self) -> usize {
        match self {
            ElementView::Real(data) => data.len(),
            ElementView::Interleaved(data) => data.len() / 2,
            ElementView::Split { re, im } => re.len().min(im.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, offset: usize) -> Result<Complex<T>, LayoutError> {
        let len = self.len();
        if offset >= len {
            return Err(LayoutError::OutOfBounds { offset, len });
        }
        Ok(match self {
            ElementView::Real(data) => Complex::from_real(data[offset]),
            ElementView::Interleaved(data) => Complex::new(data[2 * offset], data[2 * offset + 1]),
            ElementView::Split { re, im } => Complex::new(re[offset], im[offset]),
        })
    }
}

/// Write access to a container as a sequence of complex elements.
#[derive(Debug)]
pub enum ElementViewMut<'a, T: Float> {
    /// Real scalars; the imaginary part of stored values is dropped.
    Real(&'a mut [T]),
    Interleaved(&'a mut [T]),
    Split { re: &'a mut [T], im: &'a mut [T] },
}

impl<'a, T: Float> ElementViewMut<'a, T> {
    pub fn for_side(
        side: Side,
        split: bool,
        primary: &'a mut [T],
        secondary: &'a mut [T],
    ) -> Self {
        match (side, split) {
            (Side::Real, _) => ElementViewMut::Real(primary),
            (Side::Complex, false) => ElementViewMut::Interleaved(primary),
            (Side::Complex, true) => ElementViewMut::Split {
                re: primary,
                im: secondary,
            },
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ElementViewMut::Real(data) => data.len(),
            ElementViewMut::Interleaved(data) => data.len() / 2,
            ElementViewMut::Split { re, im } => re.len().min(im.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set(&mut self, offset: usize, value: Complex<T>) -> Result<(), LayoutError> {
        let len = self.len();
        if offset >= len {
            return Err(LayoutError::OutOfBounds { offset, len });
        }
        match self {
            ElementViewMut::Real(data) => data[offset] = value.re,
            ElementViewMut::Interleaved(data) => {
                data[2 * offset] = value.re;
                data[2 * offset + 1] = value.im;
            }
            ElementViewMut::Split { re, im } => {
                re[offset] = value.re;
                im[offset] = value.im;
            }
        }
        Ok(())
    }
}

/// Copy the elements addressed by `strides` over `extents` into a dense
/// row-major array.
pub fn gather<T: Float>(
    view: &ElementView<'_, T>,
    strides: &Strides,
    extents: &[usize],
) -> Result<Vec<Complex<T>>, LayoutError> {
    if strides.rank() != extents.len() {
        return Err(LayoutError::RankMismatch {
            strides: strides.rank(),
            extents: extents.len(),
        });
    }
    let mut dense = Vec::with_capacity(extents.iter().product());
    for_each_index(extents, |index, _| {
        dense.push(view.get(strides.offset_of(index)?)?);
        Ok(())
    })?;
    Ok(dense)
}

/// Inverse of [`gather`]: write a dense row-major array through `strides`.
/// Elements not addressed by the strides are left untouched.
pub fn scatter<T: Float>(
    dense: &[Complex<T>],
    view: &mut ElementViewMut<'_, T>,
    strides: &Strides,
    extents: &[usize],
) -> Result<(), LayoutError> {
    if strides.rank() != extents.len() {
        return Err(LayoutError::RankMismatch {
            strides: strides.rank(),
            extents: extents.len(),
        });
    }
    let expected: usize = extents.iter().product();
    if dense.len() != expected {
        return Err(LayoutError::LengthMismatch {
            expected,
            actual: dense.len(),
        });
    }
    for_each_index(extents, |index, linear| {
        view.set(strides.offset_of(index)?, dense[linear])
    })
}

/// Keep the first `n/2 + 1` elements of the last axis of a full spectrum.
pub fn truncate_conjugate_even<T: Float>(
    full: &[Complex<T>],
    extents: &[usize],
) -> Result<Vec<Complex<T>>, LayoutError> {
    let expected: usize = extents.iter().product();
    if full.len() != expected {
        return Err(LayoutError::LengthMismatch {
            expected,
            actual: full.len(),
        });
    }
    let half = conjugate_even_extents(extents);
    let full_strides = Strides::row_major(extents);
    let mut out = Vec::with_capacity(half.iter().product());
    for_each_index(&half, |index, _| {
        out.push(full[full_strides.offset_of(index)?]);
        Ok(())
    })?;
    Ok(out)
}

/// Rebuild a full spectrum from its conjugate-even half using
/// `X[k] = conj(X[-k mod n])` on every axis.
pub fn expand_conjugate_even<T: Float>(
    half: &[Complex<T>],
    extents: &[usize],
) -> Result<Vec<Complex<T>>, LayoutError> {
    let half_extents = conjugate_even_extents(extents);
    let expected: usize = half_extents.iter().product();
    if half.len() != expected {
        return Err(LayoutError::LengthMismatch {
            expected,
            actual: half.len(),
        });
    }
    let Some(&last_extent) = half_extents.last() else {
        return Ok(Vec::new());
    };
    let half_strides = Strides::row_major(&half_extents);
    let mut mirrored = vec![0usize; extents.len()];
    let mut full = Vec::with_capacity(extents.iter().product());
    for_each_index(extents, |index, _| {
        let last = index[index.len() - 1];
        if last < last_extent {
            full.push(half[half_strides.offset_of(index)?]);
        } else {
            for (axis, &i) in index.iter().enumerate() {
                mirrored[axis] = (extents[axis] - i) % extents[axis];
            }
            full.push(half[half_strides.offset_of(&mirrored)?].conj());
        }
        Ok(())
    })?;
    Ok(full)
}
