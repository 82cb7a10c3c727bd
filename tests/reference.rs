// Test intent: checks the oracle against known transform pairs and the
// algebraic properties every DFT satisfies.
use dftcheck::num::{Complex32, Complex64};
use dftcheck::reference::{
    forward_dft, forward_dft_1d, forward_dft_vec, StridedView, StridedViewMut,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_complex(len: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

fn random_real(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn max_abs(v: &[Complex64]) -> f64 {
    v.iter().map(|c| c.abs()).fold(0.0, f64::max)
}

fn assert_close(actual: &[Complex64], expected: &[Complex64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    let scale = max_abs(expected).max(1.0);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let err = (*a - *e).abs();
        assert!(err <= tol * scale, "[{i}] {a:?} vs {e:?} (err {err:e})");
    }
}

#[test]
fn constant_and_impulse_pairs() {
    let ones = [1.0f64; 4];
    let out = forward_dft_vec(&ones, 1).unwrap();
    assert_close(
        &out,
        &[
            Complex64::new(4.0, 0.0),
            Complex64::zero(),
            Complex64::zero(),
            Complex64::zero(),
        ],
        1e-15,
    );

    let mut impulse = vec![Complex64::zero(); 8];
    impulse[0] = Complex64::new(1.0, 0.0);
    let out = forward_dft_vec(&impulse, 1).unwrap();
    assert_close(&out, &[Complex64::new(1.0, 0.0); 8], 0.0);

    let mut impulse = vec![Complex64::zero(); 27];
    impulse[0] = Complex64::new(1.0, 0.0);
    let out = forward_dft_vec(&impulse, 3).unwrap();
    assert_close(&out, &[Complex64::new(1.0, 0.0); 27], 0.0);
}

#[test]
fn length_one_is_identity_for_every_rank() {
    for dims in 1..=3 {
        let input = [Complex64::new(-0.75, 0.5)];
        let mut output = [Complex64::zero()];
        forward_dft(&input, &mut output, dims).unwrap();
        assert_eq!(output[0], input[0]);
    }
}

#[test]
fn linearity() {
    for (size, dims) in [(21, 1), (8, 2), (5, 3)] {
        let len = usize::pow(size, dims as u32);
        let x = random_complex(len, 1);
        let y = random_complex(len, 2);
        let (a, b) = (Complex64::new(0.5, -1.5), Complex64::new(2.0, 0.25));
        let combined: Vec<Complex64> = x.iter().zip(&y).map(|(&p, &q)| a * p + b * q).collect();
        let fx = forward_dft_vec(&x, dims).unwrap();
        let fy = forward_dft_vec(&y, dims).unwrap();
        let expected: Vec<Complex64> = fx.iter().zip(&fy).map(|(&p, &q)| a * p + b * q).collect();
        assert_close(&forward_dft_vec(&combined, dims).unwrap(), &expected, 1e-12);
    }
}

#[test]
fn separable_outer_products() {
    let n = 6;
    let u = random_complex(n, 3);
    let v = random_complex(n, 4);
    let w = random_complex(n, 5);
    let (fu, fv, fw) = (
        forward_dft_vec(&u, 1).unwrap(),
        forward_dft_vec(&v, 1).unwrap(),
        forward_dft_vec(&w, 1).unwrap(),
    );

    let mut plane = Vec::with_capacity(n * n);
    let mut expected = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            plane.push(u[i] * v[j]);
            expected.push(fu[i] * fv[j]);
        }
    }
    assert_close(&forward_dft_vec(&plane, 2).unwrap(), &expected, 1e-12);

    let mut volume = Vec::with_capacity(n * n * n);
    let mut expected = Vec::with_capacity(n * n * n);
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                volume.push(u[i] * v[j] * w[k]);
                expected.push(fu[i] * fv[j] * fw[k]);
            }
        }
    }
    assert_close(&forward_dft_vec(&volume, 3).unwrap(), &expected, 1e-12);
}

#[test]
fn real_input_is_conjugate_symmetric() {
    let n = 7;
    let x = random_real(n * n, 6);
    let out = forward_dft_vec(&x, 2).unwrap();
    let scale = max_abs(&out);
    for i in 0..n {
        for j in 0..n {
            let mirror = ((n - i) % n) * n + (n - j) % n;
            let err = (out[i * n + j] - out[mirror].conj()).abs();
            assert!(err < 1e-12 * scale, "({i},{j}) err {err:e}");
        }
    }
}

#[test]
fn real_input_is_conjugate_symmetric_in_one_dimension() {
    for n in [8, 21] {
        let x = random_real(n, 10);
        let out = forward_dft_vec(&x, 1).unwrap();
        let scale = max_abs(&out);
        assert!(out[0].im.abs() < 1e-12 * scale);
        for k in 1..n {
            let err = (out[n - k] - out[k].conj()).abs();
            assert!(err < 1e-12 * scale, "n {n}, bin {k}: err {err:e}");
        }
    }
}

#[test]
fn parseval() {
    for (size, dims) in [(32, 1), (8, 2), (4, 3)] {
        let len = usize::pow(size, dims as u32);
        let x = random_complex(len, 7);
        let out = forward_dft_vec(&x, dims).unwrap();
        let time: f64 = x.iter().map(|c| c.norm_sqr()).sum();
        let freq: f64 = out.iter().map(|c| c.norm_sqr()).sum();
        let rel = (freq - len as f64 * time).abs() / (len as f64 * time);
        assert!(rel < 1e-12, "size {size}, dims {dims}: {rel:e}");
    }
}

/// Textbook DFT with a different summation order and angle computation.
fn textbook_dft(x: &[Complex64]) -> Vec<Complex64> {
    let n = x.len();
    (0..n)
        .map(|k| {
            let mut sum = Complex64::zero();
            for j in (0..n).rev() {
                let angle = -2.0 * std::f64::consts::PI * (k as f64) * (j as f64) / n as f64;
                sum += x[j] * Complex64::new(angle.cos(), angle.sin());
            }
            sum
        })
        .collect()
}

#[test]
fn agrees_with_independent_textbook_dft() {
    for n in [8, 21, 32] {
        let x = random_complex(n, n as u64);
        let ours = forward_dft_vec(&x, 1).unwrap();
        let theirs = textbook_dft(&x);
        let scale = max_abs(&theirs);
        for (a, b) in ours.iter().zip(&theirs) {
            assert!((*a - *b).abs() / scale < 1e-9);
        }
    }
}

#[test]
fn real_input_agrees_with_independent_textbook_dft() {
    let x = random_real(8, 11);
    let ours = forward_dft_vec(&x, 1).unwrap();
    let promoted: Vec<Complex64> = x.iter().map(|&v| Complex64::from_real(v)).collect();
    let theirs = textbook_dft(&promoted);
    let scale = max_abs(&theirs);
    for (k, (a, b)) in ours.iter().zip(&theirs).enumerate() {
        let rel = (*a - *b).abs() / scale;
        assert!(rel < 1e-9, "bin {k}: {rel:e}");
    }
}

#[test]
fn single_precision_output_is_narrowed_double_result() {
    let mut rng = StdRng::seed_from_u64(8);
    for dims in 1..=3 {
        let len = usize::pow(5, dims as u32);
        let x: Vec<Complex32> = (0..len)
            .map(|_| Complex32::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)))
            .collect();
        let mut narrow = vec![Complex32::zero(); len];
        let mut wide = vec![Complex64::zero(); len];
        forward_dft(&x, &mut narrow, dims).unwrap();
        forward_dft(&x, &mut wide, dims).unwrap();
        for (n, w) in narrow.iter().zip(&wide) {
            assert_eq!(n.re, w.re as f32);
            assert_eq!(n.im, w.im as f32);
        }
    }
}

#[test]
fn strided_kernel_reads_and_writes_through_views() {
    // two interleaved signals; transform the odd one into the even slots
    let n = 5;
    let data = random_complex(2 * n, 9);
    let odd: Vec<Complex64> = data.iter().skip(1).step_by(2).copied().collect();
    let mut out = vec![Complex64::new(9.0, 9.0); 2 * n];
    let input = StridedView::new(&data, 1, 2, n).unwrap();
    let mut output = StridedViewMut::new(&mut out, 0, 2, n).unwrap();
    forward_dft_1d(&input, &mut output).unwrap();
    let expected = forward_dft_vec(&odd, 1).unwrap();
    for k in 0..n {
        assert_eq!(out[2 * k], expected[k]);
        assert_eq!(out[2 * k + 1], Complex64::new(9.0, 9.0));
    }
}
