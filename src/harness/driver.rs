//! Forward/backward compute test of a single case.
//!
//! The input is generated from a seeded [`StdRng`], transformed by the
//! oracle, staged into host containers in the layout the case asks for and
//! handed to the backend. The forward result is compared with the oracle
//! (conjugate-even half for real transforms) and the backward result,
//! scaled by `1/N^d`, with the input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{HarnessError, TestCase};
use crate::backend::{BackendError, DftBackend, DftData};
use crate::compare::{check_equal_real_vector, check_equal_vector};
use crate::descriptor::{ComplexStorage, Descriptor, Direction, Domain, Placement, Precision};
use crate::layout::{
    conjugate_even_extents, conjugate_even_size, gather, scatter, truncate_conjugate_even,
    ElementView, ElementViewMut, LayoutError, Side, Strides,
};
use crate::num::{Complex, Float};
use crate::reference::{forward_dft_shaped, DftInput, ReferenceError, Shape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Skipped(String),
    /// One message per failed stage.
    Failed(Vec<String>),
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TestOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestOutcome::Failed(_))
    }
}

/// Input samples of a case.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal<T: Float> {
    Real(Vec<T>),
    Complex(Vec<Complex<T>>),
}

impl<T: Float + DftInput> Signal<T> {
    /// `len` samples uniform in `[-0.5, 0.5)`; complex samples draw both parts.
    pub fn random(domain: Domain, len: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sample = || T::from_f64(rng.gen_range(-0.5..0.5));
        match domain {
            Domain::Real => Signal::Real((0..len).map(|_| sample()).collect()),
            Domain::Complex => Signal::Complex(
                (0..len)
                    .map(|_| {
                        let re = sample();
                        Complex::new(re, sample())
                    })
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Signal::Real(x) => x.len(),
            Signal::Complex(x) => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_complex(&self) -> Vec<Complex<T>> {
        match self {
            Signal::Real(x) => x.iter().map(|&v| Complex::from_real(v)).collect(),
            Signal::Complex(x) => x.clone(),
        }
    }

    /// Oracle forward transform, narrowed to `T`.
    pub fn reference(&self, shape: Shape) -> Result<Vec<Complex<T>>, ReferenceError> {
        let mut out = vec![Complex::zero(); shape.len()];
        match self {
            Signal::Real(x) => forward_dft_shaped(x, &mut out, shape)?,
            Signal::Complex(x) => forward_dft_shaped(x, &mut out, shape)?,
        }
        Ok(out)
    }
}

/// Host copy of a device container; `im` is only used by split layouts.
#[derive(Debug, Clone)]
struct Container<T> {
    re: Vec<T>,
    im: Vec<T>,
}

impl<T: Float> Container<T> {
    /// Large enough for every `(side, elements)` it will hold.
    fn sized(split: bool, sides: &[(Side, usize)]) -> Self {
        let mut re_len = 0;
        let mut im_len = 0;
        for &(side, elements) in sides {
            match (side, split) {
                (Side::Real, _) => re_len = re_len.max(elements),
                (Side::Complex, false) => re_len = re_len.max(2 * elements),
                (Side::Complex, true) => {
                    re_len = re_len.max(elements);
                    im_len = im_len.max(elements);
                }
            }
        }
        Self {
            re: vec![T::zero(); re_len],
            im: vec![T::zero(); im_len],
        }
    }

    fn write(
        &mut self,
        side: Side,
        split: bool,
        strides: &Strides,
        extents: &[usize],
        dense: &[Complex<T>],
    ) -> Result<(), LayoutError> {
        let mut view = ElementViewMut::for_side(side, split, &mut self.re, &mut self.im);
        scatter(dense, &mut view, strides, extents)
    }

    fn read(
        &self,
        side: Side,
        split: bool,
        strides: &Strides,
        extents: &[usize],
    ) -> Result<Vec<Complex<T>>, LayoutError> {
        gather(
            &ElementView::for_side(side, split, &self.re, &self.im),
            strides,
            extents,
        )
    }

    fn in_place(&mut self, split: bool) -> DftData<'_, T> {
        if split {
            DftData::InPlaceSplit {
                re: &mut self.re,
                im: &mut self.im,
            }
        } else {
            DftData::InPlace(&mut self.re)
        }
    }
}

fn out_of_place<'a, T: Float>(
    split: bool,
    input: &'a Container<T>,
    output: &'a mut Container<T>,
) -> DftData<'a, T> {
    if split {
        DftData::OutOfPlaceSplit {
            input_re: &input.re,
            input_im: &input.im,
            output_re: &mut output.re,
            output_im: &mut output.im,
        }
    } else {
        DftData::OutOfPlace {
            input: &input.re,
            output: &mut output.re,
        }
    }
}

/// Where a container's data lives for one direction of a descriptor.
struct Placed<'d> {
    side: Side,
    strides: &'d Strides,
    extents: Vec<usize>,
}

impl<'d> Placed<'d> {
    fn input(descriptor: &'d Descriptor, direction: Direction) -> Self {
        let side = descriptor.sides(direction).0;
        Self {
            side,
            strides: descriptor.input_strides(),
            extents: descriptor.extents(side),
        }
    }

    fn output(descriptor: &'d Descriptor, direction: Direction) -> Self {
        let side = descriptor.sides(direction).1;
        Self {
            side,
            strides: descriptor.output_strides(),
            extents: descriptor.extents(side),
        }
    }

    fn elements(&self) -> Result<usize, LayoutError> {
        self.strides.required_len(&self.extents)
    }
}

/// A case bound to its element type, input and oracle result.
#[derive(Debug, Clone)]
pub struct DftTest<T: Float> {
    case: TestCase,
    error_margin: u32,
    input: Signal<T>,
    reference: Vec<Complex<T>>,
}

impl<T: Float + DftInput> DftTest<T> {
    pub fn new(case: TestCase, seed: u64, error_margin: u32) -> Result<Self, HarnessError> {
        if case.precision != T::PRECISION {
            return Err(HarnessError::PrecisionMismatch {
                case: case.precision,
                data: T::PRECISION,
            });
        }
        let shape = Shape::cubic(case.size, case.dimensions)?;
        let input = Signal::random(case.domain, shape.len(), seed);
        let reference = input.reference(shape)?;
        Ok(Self {
            case,
            error_margin,
            input,
            reference,
        })
    }

    pub fn case(&self) -> &TestCase {
        &self.case
    }

    pub fn input(&self) -> &Signal<T> {
        &self.input
    }

    /// Full oracle spectrum of the input.
    pub fn reference(&self) -> &[Complex<T>] {
        &self.reference
    }

    /// Forward and backward descriptors. Real transforms swap the real and
    /// complex strides between the two; in-place real data uses padded rows
    /// of `2(N/2+1)` scalars.
    pub fn descriptors(&self) -> (Descriptor, Descriptor) {
        let case = &self.case;
        let lengths = case.lengths();
        let base = Descriptor::new(case.precision, case.domain, lengths.clone())
            .with_placement(case.placement)
            .with_complex_storage(case.layout);
        let scale = 1.0 / case.total_len() as f64;
        match case.domain {
            Domain::Complex => (base.clone(), base.with_backward_scale(scale)),
            Domain::Real => {
                let real = match case.placement {
                    Placement::InPlace => {
                        Strides::padded_rows(&lengths, conjugate_even_size(case.size))
                    }
                    Placement::OutOfPlace => Strides::row_major(&lengths),
                };
                let complex = Strides::row_major(&conjugate_even_extents(&lengths));
                let forward = base
                    .clone()
                    .with_input_strides(real.clone())
                    .with_output_strides(complex.clone());
                let backward = base
                    .with_input_strides(complex)
                    .with_output_strides(real)
                    .with_backward_scale(scale);
                (forward, backward)
            }
        }
    }

    fn backend_error(&self, direction: Direction, err: BackendError) -> TestOutcome {
        match err {
            BackendError::Unimplemented(what) => {
                log::info!("skipping {}: {what}", self.case);
                TestOutcome::Skipped(what)
            }
            other => {
                log::warn!("{} {direction:?} call failed: {other}", self.case);
                TestOutcome::Failed(vec![format!("{direction:?} call failed: {other}")])
            }
        }
    }

    /// Run the case against `backend`.
    pub fn run<B: DftBackend>(&self, backend: &B) -> Result<TestOutcome, HarnessError> {
        let case = &self.case;
        if let Some(reason) = case.skip_reason(&backend.device()) {
            log::info!("skipping {case}: {reason}");
            return Ok(TestOutcome::Skipped(reason));
        }
        let (forward, backward) = self.descriptors();
        let split = case.layout == ComplexStorage::RealReal;
        let fwd_in = Placed::input(&forward, Direction::Forward);
        let fwd_out = Placed::output(&forward, Direction::Forward);
        let bwd_out = Placed::output(&backward, Direction::Backward);
        let input = self.input.to_complex();

        log::debug!("{case}: forward");
        let (spectrum, round_trip) = match case.placement {
            Placement::InPlace => {
                let mut buffer = Container::sized(
                    split,
                    &[
                        (fwd_in.side, fwd_in.elements()?),
                        (fwd_out.side, fwd_out.elements()?),
                    ],
                );
                buffer.write(fwd_in.side, split, fwd_in.strides, &fwd_in.extents, &input)?;
                if let Err(e) = backend.compute_forward(&forward, buffer.in_place(split)) {
                    return Ok(self.backend_error(Direction::Forward, e));
                }
                let spectrum = buffer.read(fwd_out.side, split, fwd_out.strides, &fwd_out.extents)?;
                log::debug!("{case}: backward");
                if let Err(e) = backend.compute_backward(&backward, buffer.in_place(split)) {
                    return Ok(self.backend_error(Direction::Backward, e));
                }
                let round_trip =
                    buffer.read(bwd_out.side, split, bwd_out.strides, &bwd_out.extents)?;
                (spectrum, round_trip)
            }
            Placement::OutOfPlace => {
                let mut source = Container::sized(split, &[(fwd_in.side, fwd_in.elements()?)]);
                source.write(fwd_in.side, split, fwd_in.strides, &fwd_in.extents, &input)?;
                let mut transformed =
                    Container::sized(split, &[(fwd_out.side, fwd_out.elements()?)]);
                let data = out_of_place(split, &source, &mut transformed);
                if let Err(e) = backend.compute_forward(&forward, data) {
                    return Ok(self.backend_error(Direction::Forward, e));
                }
                let spectrum =
                    transformed.read(fwd_out.side, split, fwd_out.strides, &fwd_out.extents)?;
                log::debug!("{case}: backward");
                let mut restored = Container::sized(split, &[(bwd_out.side, bwd_out.elements()?)]);
                if let Err(e) = backend
                    .compute_backward(&backward, out_of_place(split, &transformed, &mut restored))
                {
                    return Ok(self.backend_error(Direction::Backward, e));
                }
                let round_trip =
                    restored.read(bwd_out.side, split, bwd_out.strides, &bwd_out.extents)?;
                (spectrum, round_trip)
            }
        };

        let mut failures = Vec::new();
        let expected = match case.domain {
            Domain::Real => truncate_conjugate_even(&self.reference, &case.lengths())?,
            Domain::Complex => self.reference.clone(),
        };
        let forward_check = check_equal_vector(&spectrum, &expected, self.error_margin);
        if !forward_check.is_ok() {
            failures.push(format!("forward: {forward_check}"));
        }
        let backward_check = match &self.input {
            Signal::Real(x) => {
                let restored: Vec<T> = round_trip.iter().map(|c| c.re).collect();
                check_equal_real_vector(&restored, x, self.error_margin)
            }
            Signal::Complex(x) => check_equal_vector(&round_trip, x, self.error_margin),
        };
        if !backward_check.is_ok() {
            failures.push(format!("backward: {backward_check}"));
        }

        if failures.is_empty() {
            log::debug!("{case}: passed");
            Ok(TestOutcome::Passed)
        } else {
            for failure in &failures {
                log::warn!("{case} {failure}");
            }
            Ok(TestOutcome::Failed(failures))
        }
    }
}

/// Run `case` with the element type its precision selects.
pub fn run_case<B: DftBackend>(
    backend: &B,
    case: &TestCase,
    seed: u64,
    error_margin: u32,
) -> Result<TestOutcome, HarnessError> {
    if let Some(reason) = case.skip_reason(&backend.device()) {
        log::info!("skipping {case}: {reason}");
        return Ok(TestOutcome::Skipped(reason));
    }
    match case.precision {
        Precision::Single => DftTest::<f32>::new(*case, seed, error_margin)?.run(backend),
        Precision::Double => DftTest::<f64>::new(*case, seed, error_margin)?.run(backend),
    }
}
