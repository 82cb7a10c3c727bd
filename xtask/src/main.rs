use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for dftcheck")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    #[command(name = "no-std")]
    NoStd,
    Clippy,
    Fmt,
    Analyze,
    Bench,
    Sanity {
        /// Backend under test
        #[arg(long, default_value = "direct")]
        backend: String,
        /// Arguments forwarded to sanity-check, after `--`
        #[arg(last = true)]
        args: Vec<String>,
    },
}

#[cfg(not(test))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    let status = match cli.command {
        Commands::Build => build_command(&cfg).status(),
        Commands::Test => test_command(&cfg).status(),
        Commands::NoStd => no_std_command().status(),
        Commands::Clippy => clippy_command().status(),
        Commands::Fmt => fmt_command().status(),
        Commands::Analyze => {
            let fmt = fmt_command().status()?;
            if !fmt.success() {
                Ok(fmt)
            } else {
                clippy_command().status()
            }
        }
        Commands::Bench => bench_command(&cfg).status(),
        Commands::Sanity { backend, args } => sanity_command(&cfg, &backend, &args).status(),
    }?;

    if !status.success() {
        anyhow::bail!("command exited with {status}");
    }
    Ok(())
}
