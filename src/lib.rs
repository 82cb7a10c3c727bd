//! # dftcheck - reference DFT oracle and correctness harness
//!
//! `dftcheck` validates Discrete Fourier Transform libraries against a naive,
//! double-precision direct transform. Every output bin of the oracle is an
//! O(N²) sum sharing no algorithmic structure with a fast transform.
//!
//! ## Layers
//!
//! - [`reference`]: the oracle, 1-D kernel plus separable 2-D/3-D composition.
//! - [`layout`]: stride vectors, conjugate-even storage, gather/scatter.
//! - [`descriptor`]: transform configuration handed to a library.
//! - [`backend`]: the [`DftBackend`] seam and the oracle-backed [`DirectBackend`].
//! - [`compare`]: element-wise tolerance checks.
//! - [`config`] and [`harness`] (`std` only): the compute test matrix.
//!
//! ## Cargo Features
//!
//! - `std` (default): configuration, seeded input generation and the harness
//! - `parallel`: run suite cases on a Rayon thread pool
//!
//! Without `std` the oracle, layouts, descriptor, backend seam and
//! comparisons build for `no_std + alloc` targets.
//!
//! ```
//! use dftcheck::num::Complex32;
//! use dftcheck::reference::forward_dft;
//!
//! let input = [Complex32::new(0.0, 0.0), Complex32::new(1.0, 0.0)];
//! let mut output = [Complex32::zero(); 2];
//! forward_dft(&input, &mut output, 1).unwrap();
//! assert_eq!(output[0].re, 1.0);
//! assert_eq!(output[1].re, -1.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod backend;
/// Element-wise comparison of library output against the oracle.
pub mod compare;
pub mod descriptor;
pub mod layout;
/// Float and complex number types shared by every layer.
pub mod num;
pub mod reference;

#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod harness;

pub use backend::{BackendError, DftBackend, DftData, DirectBackend};
pub use num::{Complex, Complex32, Complex64, Float};
pub use reference::{forward_dft, forward_dft_1d, ReferenceError};

#[cfg(feature = "std")]
pub use config::HarnessConfig;
#[cfg(feature = "std")]
pub use harness::{Suite, SuiteReport, TestOutcome};
