use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dftcheck::num::{Complex32, Complex64};
use dftcheck::reference::forward_dft;
use dftcheck_bench::random_signal;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference");
    for (size, dims) in [(32, 1), (256, 1), (21, 2), (32, 2), (8, 3), (21, 3)] {
        let len = usize::pow(size, dims as u32);
        let input = random_signal(len, 1);
        let mut output = vec![Complex64::zero(); len];
        group.bench_with_input(
            BenchmarkId::new(format!("{dims}d"), size),
            &input,
            |b, input| {
                b.iter(|| forward_dft(input, &mut output, dims).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_narrowed_output(c: &mut Criterion) {
    let input: Vec<f32> = random_signal(1024, 2).iter().map(|v| v.re as f32).collect();
    let mut output = vec![Complex32::zero(); 1024];
    c.bench_function("reference_real_f32_1024", |b| {
        b.iter(|| forward_dft(&input, &mut output, 1).unwrap());
    });
}

fn bench_rustfft_baseline(c: &mut Criterion) {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(1024);
    let input: Vec<Complex<f64>> = random_signal(1024, 3)
        .iter()
        .map(|v| Complex::new(v.re, v.im))
        .collect();
    c.bench_function("rustfft_1024", |b| {
        b.iter(|| {
            let mut data = input.clone();
            fft.process(&mut data);
            data
        });
    });
}

criterion_group!(
    benches,
    bench_oracle,
    bench_narrowed_output,
    bench_rustfft_baseline
);
criterion_main!(benches);
