// Test intent: contract violations surface as errors instead of panics.
use dftcheck::num::Complex64;
use dftcheck::reference::{
    forward_dft, forward_dft_1d, forward_dft_shaped, ReferenceError, Shape, StridedView,
    StridedViewMut,
};

#[test]
fn empty_transform_is_rejected() {
    let input: [f64; 0] = [];
    let mut output: [Complex64; 0] = [];
    assert_eq!(
        forward_dft(&input, &mut output, 1),
        Err(ReferenceError::EmptyInput)
    );
    assert_eq!(
        forward_dft_1d(
            &StridedView::contiguous(&input),
            &mut StridedViewMut::contiguous(&mut output)
        ),
        Err(ReferenceError::EmptyInput)
    );
}

#[test]
fn mismatched_lengths_are_rejected() {
    let input = [1.0f64; 8];
    let mut output = [Complex64::zero(); 4];
    assert_eq!(
        forward_dft(&input, &mut output, 1),
        Err(ReferenceError::MismatchedLengths)
    );
    let mut short = [Complex64::zero(); 7];
    assert_eq!(
        forward_dft_1d(
            &StridedView::contiguous(&input),
            &mut StridedViewMut::contiguous(&mut short)
        ),
        Err(ReferenceError::MismatchedLengths)
    );
}

#[test]
fn dimension_count_is_limited_to_three() {
    let input = [1.0f64; 16];
    let mut output = [Complex64::zero(); 16];
    assert_eq!(
        forward_dft(&input, &mut output, 4),
        Err(ReferenceError::UnsupportedDimensions(4))
    );
    assert_eq!(
        forward_dft(&input, &mut output, 0),
        Err(ReferenceError::UnsupportedDimensions(0))
    );
}

#[test]
fn non_power_lengths_are_rejected() {
    let input = [1.0f64; 12];
    let mut output = [Complex64::zero(); 12];
    assert_eq!(
        forward_dft(&input, &mut output, 2),
        Err(ReferenceError::NotPerfectPower {
            len: 12,
            dimensions: 2
        })
    );
    let shape = Shape::cubic(3, 2).unwrap();
    assert!(matches!(
        forward_dft_shaped(&input, &mut output, shape),
        Err(ReferenceError::NotPerfectPower { .. })
    ));
}

#[test]
fn oversized_shapes_overflow_cleanly() {
    assert_eq!(
        Shape::cubic(usize::MAX / 2, 3),
        Err(ReferenceError::Overflow)
    );
}

#[test]
fn errors_render_readable_messages() {
    let msg = ReferenceError::NotPerfectPower {
        len: 12,
        dimensions: 2,
    }
    .to_string();
    assert!(msg.contains("12"));
    let err: Box<dyn std::error::Error> = Box::new(ReferenceError::EmptyInput);
    assert!(err.to_string().contains("non-zero"));
}
