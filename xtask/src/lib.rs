use std::env;
use std::process::Command;

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub threads: usize,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let extra = env::var("DFTCHECK_FEATURES").unwrap_or_default();
    compute_config(detect_nproc(), &extra)
}

fn detect_nproc() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(nproc: usize, extra: &str) -> BuildConfig {
    let mut features: Vec<String> = Vec::new();
    if nproc > 1 {
        features.push("parallel".into());
    }
    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    BuildConfig {
        features,
        threads: nproc.max(1),
    }
}

fn cargo_with_features(subcommand: &str, cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    cargo_with_features("build", cfg)
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo_with_features("test", cfg);
    cmd.env("DFTCHECK_THREADS", cfg.threads.to_string());
    cmd
}

/// Build the oracle without the standard library.
pub fn no_std_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["build", "-p", "dftcheck", "--no-default-features"]);
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--workspace", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn bench_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["bench", "-p", "dftcheck-bench"]);
    if cfg.features.iter().any(|f| f == "parallel") {
        cmd.arg("--features").arg("parallel");
    }
    cmd
}

/// Run the sanity-check binary against `backend`, forwarding `extra` arguments.
pub fn sanity_command(cfg: &BuildConfig, backend: &str, extra: &[String]) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-r", "-p", "sanity-check"]);
    if cfg.features.iter().any(|f| f == "parallel") {
        cmd.arg("--features").arg("parallel");
    }
    cmd.env("DFTCHECK_THREADS", cfg.threads.to_string());
    cmd.args(["--", "--backend", backend]);
    cmd.args(extra);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_compute_multicore() {
        let cfg = compute_config(4, "extra parallel");
        assert_eq!(cfg.features, ["parallel", "extra"]);
        assert_eq!(cfg.threads, 4);
        assert_eq!(cfg.features_arg().as_deref(), Some("parallel extra"));
    }

    #[test]
    fn test_compute_single_core() {
        let cfg = compute_config(1, "");
        assert!(cfg.features.is_empty());
        assert_eq!(cfg.features_arg(), None);
        let cfg = compute_config(0, "");
        assert_eq!(cfg.threads, 1);
    }

    #[test]
    fn test_commands_include_features() {
        let cfg = compute_config(2, "");
        let build = args(&build_command(&cfg));
        assert_eq!(build, ["build", "--features", "parallel"]);
        let test = test_command(&cfg);
        assert!(test
            .get_envs()
            .any(|(k, v)| k == "DFTCHECK_THREADS" && v.is_some_and(|v| v == "2")));
    }

    #[test]
    fn test_other_commands() {
        let cfg = compute_config(1, "");
        assert!(args(&clippy_command()).contains(&"--workspace".to_string()));
        assert!(args(&fmt_command()).contains(&"fmt".to_string()));
        assert!(args(&no_std_command()).contains(&"--no-default-features".to_string()));
        assert_eq!(args(&bench_command(&cfg)), ["bench", "-p", "dftcheck-bench"]);
        let sanity = args(&sanity_command(
            &cfg,
            "rustfft",
            &["--sizes".to_string(), "8".to_string()],
        ));
        assert!(sanity.contains(&"sanity-check".to_string()));
        let tail = &sanity[sanity.len() - 5..];
        assert_eq!(tail, ["--", "--backend", "rustfft", "--sizes", "8"]);
    }
}
