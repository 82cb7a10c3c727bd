//! Interface to the DFT library under test.
//!
//! A backend receives a committed [`Descriptor`] and caller-owned buffers,
//! mirroring the descriptor/compute entry points of a DFT library.
//! [`run_staged`] does the layout work most backends need: it gathers the
//! strided input into a dense full spectrum, lets the backend transform
//! it, applies the direction's scale and scatters the result back.

use alloc::string::String;
use alloc::vec::Vec;

use crate::descriptor::{
    ComplexStorage, Descriptor, DescriptorError, Direction, Domain, Placement, Precision,
};
use crate::layout::{
    expand_conjugate_even, gather, scatter, truncate_conjugate_even, ElementView, ElementViewMut,
    LayoutError, Side,
};
use crate::num::{Complex, Float};
use crate::reference::{forward_dft_shaped, ReferenceError, Shape};

/// Memory model used to hand data to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// Buffers managed by the runtime.
    Buffer,
    /// Unified shared memory visible to host and device.
    Usm,
}

impl Storage {
    pub fn name(self) -> &'static str {
        match self {
            Storage::Buffer => "buffer",
            Storage::Usm => "USM",
        }
    }
}

/// Capabilities of the device a backend runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub supports_fp64: bool,
    pub supports_shared_usm: bool,
}

impl DeviceInfo {
    /// Host device with every capability available.
    pub fn host(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supports_fp64: true,
            supports_shared_usm: true,
        }
    }
}

/// Buffers passed to a compute call.
///
/// Complex data is interleaved `[re, im]` unless a split variant is used;
/// real data always lives in the primary (`re`) buffer.
#[derive(Debug)]
pub enum DftData<'a, T> {
    InPlace(&'a mut [T]),
    InPlaceSplit {
        re: &'a mut [T],
        im: &'a mut [T],
    },
    OutOfPlace {
        input: &'a [T],
        output: &'a mut [T],
    },
    OutOfPlaceSplit {
        input_re: &'a [T],
        input_im: &'a [T],
        output_re: &'a mut [T],
        output_im: &'a mut [T],
    },
}

impl<T> DftData<'_, T> {
    pub fn is_in_place(&self) -> bool {
        matches!(self, DftData::InPlace(_) | DftData::InPlaceSplit { .. })
    }

    pub fn is_split(&self) -> bool {
        matches!(
            self,
            DftData::InPlaceSplit { .. } | DftData::OutOfPlaceSplit { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The backend does not implement this configuration; callers skip.
    Unimplemented(String),
    /// Buffers do not match the descriptor.
    InvalidConfiguration(String),
    PrecisionMismatch {
        descriptor: Precision,
        data: Precision,
    },
    Descriptor(DescriptorError),
    Layout(LayoutError),
    Reference(ReferenceError),
    /// Failure reported by the underlying library.
    Failed(String),
}

impl core::fmt::Display for BackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BackendError::Unimplemented(what) => write!(f, "unimplemented: {what}"),
            BackendError::InvalidConfiguration(what) => {
                write!(f, "invalid configuration: {what}")
            }
            BackendError::PrecisionMismatch { descriptor, data } => write!(
                f,
                "descriptor precision {} does not match {} data",
                descriptor.name(),
                data.name()
            ),
            BackendError::Descriptor(e) => write!(f, "descriptor: {e}"),
            BackendError::Layout(e) => write!(f, "layout: {e}"),
            BackendError::Reference(e) => write!(f, "reference: {e}"),
            BackendError::Failed(what) => write!(f, "backend failure: {what}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BackendError {}

impl From<DescriptorError> for BackendError {
    fn from(e: DescriptorError) -> Self {
        BackendError::Descriptor(e)
    }
}

impl From<LayoutError> for BackendError {
    fn from(e: LayoutError) -> Self {
        BackendError::Layout(e)
    }
}

impl From<ReferenceError> for BackendError {
    fn from(e: ReferenceError) -> Self {
        BackendError::Reference(e)
    }
}

/// A DFT implementation driven through descriptor/compute calls.
pub trait DftBackend: Sync {
    fn device(&self) -> DeviceInfo;

    fn compute_forward<T: Float>(
        &self,
        descriptor: &Descriptor,
        data: DftData<'_, T>,
    ) -> Result<(), BackendError>;

    fn compute_backward<T: Float>(
        &self,
        descriptor: &Descriptor,
        data: DftData<'_, T>,
    ) -> Result<(), BackendError>;
}

fn check_data<T: Float>(
    descriptor: &Descriptor,
    data: &DftData<'_, T>,
) -> Result<(), BackendError> {
    descriptor.commit()?;
    if descriptor.precision() != T::PRECISION {
        return Err(BackendError::PrecisionMismatch {
            descriptor: descriptor.precision(),
            data: T::PRECISION,
        });
    }
    if data.is_in_place() != (descriptor.placement() == Placement::InPlace) {
        return Err(BackendError::InvalidConfiguration(alloc::format!(
            "{} descriptor used with mismatched buffers",
            descriptor.placement().name()
        )));
    }
    if data.is_split() != (descriptor.complex_storage() == ComplexStorage::RealReal) {
        return Err(BackendError::InvalidConfiguration(String::from(
            "complex storage does not match buffer layout",
        )));
    }
    Ok(())
}

/// Stage a transform through dense full-spectrum storage.
///
/// `transform` receives the dense row-major data (always the full complex
/// spectrum, with conjugate-even input already expanded), the lengths and
/// the direction, and must transform it in place without scaling.
pub fn run_staged<T, F>(
    descriptor: &Descriptor,
    direction: Direction,
    data: DftData<'_, T>,
    transform: F,
) -> Result<(), BackendError>
where
    T: Float,
    F: FnOnce(&mut [Complex<T>], &[usize], Direction) -> Result<(), BackendError>,
{
    check_data(descriptor, &data)?;
    log::trace!(
        "staging {:?} {direction:?} transform of {:?}",
        descriptor.domain(),
        descriptor.lengths()
    );
    let (in_side, out_side) = descriptor.sides(direction);
    let lengths = descriptor.lengths();
    let real_domain = descriptor.domain() == Domain::Real;

    let dense_in = {
        let view = match &data {
            DftData::InPlace(buf) => ElementView::for_side(in_side, false, &buf[..], &[]),
            DftData::InPlaceSplit { re, im } => {
                ElementView::for_side(in_side, true, &re[..], &im[..])
            }
            DftData::OutOfPlace { input, .. } => ElementView::for_side(in_side, false, input, &[]),
            DftData::OutOfPlaceSplit {
                input_re, input_im, ..
            } => ElementView::for_side(in_side, true, input_re, input_im),
        };
        gather(&view, descriptor.input_strides(), &descriptor.extents(in_side))?
    };
    let mut dense = if real_domain && in_side == Side::Complex {
        expand_conjugate_even(&dense_in, lengths)?
    } else {
        dense_in
    };

    transform(&mut dense, lengths, direction)?;

    let scale = descriptor.scale(direction);
    if scale != 1.0 {
        let factor = T::from_f64(scale);
        for value in dense.iter_mut() {
            *value = value.scale(factor);
        }
    }
    let result: Vec<Complex<T>> = if real_domain && out_side == Side::Complex {
        truncate_conjugate_even(&dense, lengths)?
    } else {
        dense
    };

    let mut view = match data {
        DftData::InPlace(buf) => ElementViewMut::for_side(out_side, false, buf, Default::default()),
        DftData::InPlaceSplit { re, im } => ElementViewMut::for_side(out_side, true, re, im),
        DftData::OutOfPlace { output, .. } => {
            ElementViewMut::for_side(out_side, false, output, Default::default())
        }
        DftData::OutOfPlaceSplit {
            output_re,
            output_im,
            ..
        } => ElementViewMut::for_side(out_side, true, output_re, output_im),
    };
    scatter(
        &result,
        &mut view,
        descriptor.output_strides(),
        &descriptor.extents(out_side),
    )?;
    Ok(())
}

/// Backend computing every transform with the reference oracle.
///
/// Backward transforms use `backward(x) = conj(forward(conj(x)))`. It is
/// slow and exact, which makes it the control used to validate the
/// harness plumbing itself.
#[derive(Debug, Clone)]
pub struct DirectBackend {
    device: DeviceInfo,
}

impl Default for DirectBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectBackend {
    pub fn new() -> Self {
        Self {
            device: DeviceInfo::host("host (direct DFT)"),
        }
    }

    /// Report different device capabilities, e.g. to exercise skip rules.
    pub fn with_device(device: DeviceInfo) -> Self {
        Self { device }
    }
}

fn direct_transform<T: Float>(
    dense: &mut [Complex<T>],
    lengths: &[usize],
    direction: Direction,
) -> Result<(), BackendError> {
    let side = lengths[0];
    if lengths.iter().any(|&l| l != side) {
        return Err(BackendError::Unimplemented(String::from(
            "direct backend supports cubic lengths only",
        )));
    }
    let shape = Shape::cubic(side, lengths.len())?;
    let input: Vec<Complex<T>> = match direction {
        Direction::Forward => dense.to_vec(),
        Direction::Backward => dense.iter().map(|c| c.conj()).collect(),
    };
    forward_dft_shaped(&input, dense, shape)?;
    if direction == Direction::Backward {
        for value in dense.iter_mut() {
            *value = value.conj();
        }
    }
    Ok(())
}

impl DftBackend for DirectBackend {
    fn device(&self) -> DeviceInfo {
        self.device.clone()
    }

    fn compute_forward<T: Float>(
        &self,
        descriptor: &Descriptor,
        data: DftData<'_, T>,
    ) -> Result<(), BackendError> {
        run_staged(descriptor, Direction::Forward, data, direct_transform::<T>)
    }

    fn compute_backward<T: Float>(
        &self,
        descriptor: &Descriptor,
        data: DftData<'_, T>,
    ) -> Result<(), BackendError> {
        run_staged(descriptor, Direction::Backward, data, direct_transform::<T>)
    }
}
