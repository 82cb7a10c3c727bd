use clap::{Parser, ValueEnum};
use dftcheck::backend::{run_staged, BackendError, DeviceInfo, DftBackend, DftData, DirectBackend};
use dftcheck::descriptor::{Descriptor, Direction, Precision};
use dftcheck::harness::{Suite, SuiteReport, TestOutcome};
use dftcheck::num::{Complex, Complex64, Float};
use dftcheck::HarnessConfig;
use rustfft::{FftNum, FftPlanner};
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Direct O(N²) transform; every case should pass.
    Direct,
    /// rustfft planners applied axis by axis.
    Rustfft,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Direct => "direct",
            BackendKind::Rustfft => "rustfft",
        }
    }
}

/// Run the DFT compute tests against a backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "sanity-check", version)]
pub struct Cli {
    /// Backend under test
    #[arg(long, value_enum, default_value_t = BackendKind::Direct)]
    pub backend: BackendKind,

    /// Comma-separated transform sizes (overrides DFTCHECK_SIZES)
    #[arg(long, value_delimiter = ',')]
    pub sizes: Option<Vec<usize>>,

    /// Comma-separated dimension counts (overrides DFTCHECK_DIMENSIONS)
    #[arg(long, value_delimiter = ',')]
    pub dimensions: Option<Vec<usize>>,

    /// Comparison error margin
    #[arg(long)]
    pub error_margin: Option<u32>,

    /// Seed of the input generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads with the `parallel` feature
    #[arg(long)]
    pub threads: Option<usize>,

    /// Only run cases whose NAME/size label contains this string
    #[arg(long)]
    pub filter: Option<String>,

    /// Print the selected cases and exit
    #[arg(long)]
    pub list: bool,

    /// Write a JSON report to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> Result<HarnessConfig, Box<dyn Error>> {
        let mut config = HarnessConfig::from_env()?;
        if let Some(sizes) = &self.sizes {
            config.sizes = sizes.clone();
        }
        if let Some(dimensions) = &self.dimensions {
            config.dimensions = dimensions.clone();
        }
        if let Some(margin) = self.error_margin {
            config.error_margin = margin;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn suite(&self) -> Result<Suite, Box<dyn Error>> {
        let suite = Suite::new(self.config()?)?;
        Ok(match &self.filter {
            Some(pattern) => suite.filter(pattern),
            None => suite,
        })
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Backend running rustfft along each axis of the staged dense data.
#[derive(Debug, Default)]
pub struct RustFftBackend;

fn separable<F: FftNum>(
    data: &mut [num_complex::Complex<F>],
    lengths: &[usize],
    direction: Direction,
) {
    let mut planner = FftPlanner::<F>::new();
    for axis in (0..lengths.len()).rev() {
        let n = lengths[axis];
        let stride: usize = lengths[axis + 1..].iter().product();
        let fft = match direction {
            Direction::Forward => planner.plan_fft_forward(n),
            Direction::Backward => planner.plan_fft_inverse(n),
        };
        let block = n * stride;
        let mut pencil = Vec::with_capacity(n);
        for outer in 0..data.len() / block {
            for inner in 0..stride {
                let start = outer * block + inner;
                pencil.clear();
                pencil.extend((0..n).map(|i| data[start + i * stride]));
                fft.process(&mut pencil);
                for (i, v) in pencil.iter().enumerate() {
                    data[start + i * stride] = *v;
                }
            }
        }
    }
}

fn rustfft_transform<T: Float>(
    dense: &mut [Complex<T>],
    lengths: &[usize],
    direction: Direction,
) -> Result<(), BackendError> {
    match T::PRECISION {
        Precision::Single => {
            let mut buf: Vec<num_complex::Complex<f32>> = dense
                .iter()
                .map(|c| {
                    let c = c.to_c64();
                    num_complex::Complex::new(c.re as f32, c.im as f32)
                })
                .collect();
            separable(&mut buf, lengths, direction);
            for (d, v) in dense.iter_mut().zip(&buf) {
                *d = Complex::from_c64(Complex64::new(v.re as f64, v.im as f64));
            }
        }
        Precision::Double => {
            let mut buf: Vec<num_complex::Complex<f64>> = dense
                .iter()
                .map(|c| {
                    let c = c.to_c64();
                    num_complex::Complex::new(c.re, c.im)
                })
                .collect();
            separable(&mut buf, lengths, direction);
            for (d, v) in dense.iter_mut().zip(&buf) {
                *d = Complex::from_c64(Complex64::new(v.re, v.im));
            }
        }
    }
    Ok(())
}

impl DftBackend for RustFftBackend {
    fn device(&self) -> DeviceInfo {
        DeviceInfo::host("host (rustfft)")
    }

    fn compute_forward<T: Float>(
        &self,
        descriptor: &Descriptor,
        data: DftData<'_, T>,
    ) -> Result<(), BackendError> {
        run_staged(descriptor, Direction::Forward, data, rustfft_transform::<T>)
    }

    fn compute_backward<T: Float>(
        &self,
        descriptor: &Descriptor,
        data: DftData<'_, T>,
    ) -> Result<(), BackendError> {
        run_staged(descriptor, Direction::Backward, data, rustfft_transform::<T>)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonCase {
    pub name: String,
    pub size: usize,
    pub status: &'static str,
    pub messages: Vec<String>,
    pub elapsed_ms: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonReport {
    pub backend: String,
    pub device: String,
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cases: Vec<JsonCase>,
}

impl JsonReport {
    pub fn new(backend: &str, device: &DeviceInfo, report: &SuiteReport) -> Self {
        let cases = report
            .results
            .iter()
            .map(|r| {
                let (status, messages) = match &r.outcome {
                    TestOutcome::Passed => ("passed", Vec::new()),
                    TestOutcome::Skipped(reason) => ("skipped", vec![reason.clone()]),
                    TestOutcome::Failed(msgs) => ("failed", msgs.clone()),
                };
                JsonCase {
                    name: r.case.name(),
                    size: r.case.size,
                    status,
                    messages,
                    elapsed_ms: r.elapsed.as_secs_f64() * 1e3,
                }
            })
            .collect();
        Self {
            backend: backend.to_string(),
            device: device.name.clone(),
            passed: report.passed(),
            skipped: report.skipped(),
            failed: report.failed(),
            cases,
        }
    }
}

fn run_suite<B: DftBackend>(
    cli: &Cli,
    suite: &Suite,
    backend: &B,
) -> Result<SuiteReport, Box<dyn Error>> {
    let report = suite.run(backend)?;
    for result in report.failures() {
        if let TestOutcome::Failed(messages) = &result.outcome {
            for message in messages {
                println!("FAILED {}: {message}", result.case);
            }
        }
    }
    println!("{}: {report}", cli.backend.name());
    if let Some(path) = &cli.json {
        let json = JsonReport::new(cli.backend.name(), &backend.device(), &report);
        serde_json::to_writer_pretty(File::create(path)?, &json)?;
    }
    Ok(report)
}

/// Execute the command line; returns whether every case passed or skipped.
pub fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    let suite = cli.suite()?;
    if cli.list {
        for case in suite.cases() {
            println!("{case}");
        }
        return Ok(true);
    }
    let report = match cli.backend {
        BackendKind::Direct => run_suite(cli, &suite, &DirectBackend::new())?,
        BackendKind::Rustfft => run_suite(cli, &suite, &RustFftBackend)?,
    };
    Ok(report.is_success())
}
