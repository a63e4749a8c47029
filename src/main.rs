//! `lirsim` command line: replay one trace at several cache sizes.
//!
//! Usage:
//!   lirsim <TRACE> <SIZE>... [--hir-ratio PERCENT] [--policy lirs|lru] [--quiet]
//!
//! Each size runs as an independent experiment on its own thread. Reports go
//! to stdout in the order sizes were given; logs go to stderr (`RUST_LOG`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use lirsim::config::DEFAULT_HIR_RATIO_PERCENT;
use lirsim::sim::{Experiment, PolicyKind, Simulator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Lirs,
    Lru,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Lirs => PolicyKind::Lirs,
            PolicyArg::Lru => PolicyKind::Lru,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lirsim", version, about = "Simulate LIRS cache replacement over a block trace")]
struct Cli {
    /// Trace file with one `blockId,R|W` record per line.
    trace: PathBuf,

    /// Cache sizes in blocks; one experiment per size.
    #[arg(required = true, num_args = 1..)]
    sizes: Vec<usize>,

    /// Percentage of each cache reserved for resident HIR blocks.
    #[arg(long, default_value_t = DEFAULT_HIR_RATIO_PERCENT)]
    hir_ratio: u32,

    #[arg(long, value_enum, default_value_t = PolicyArg::Lirs)]
    policy: PolicyArg,

    /// Print only the `!POLICY|size|hits|accesses|` summary lines.
    #[arg(long)]
    quiet: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    if !cli.trace.is_file() {
        bail!("trace file {} does not exist", cli.trace.display());
    }

    let policy = PolicyKind::from(cli.policy);
    let mut all_ok = true;
    let mut experiments = Vec::with_capacity(cli.sizes.len());
    for &size in &cli.sizes {
        match policy.configure(size, cli.hir_ratio) {
            Ok(config) => experiments.push(Experiment::new(policy, config)),
            Err(err) => {
                error!(cache_size = size, error = %err, "skipping experiment");
                all_ok = false;
            },
        }
    }

    let simulator = Simulator::new(&cli.trace);
    for result in simulator.run_all(&experiments) {
        match result {
            Ok(report) => {
                if !cli.quiet {
                    println!("{report}");
                }
                println!("{}", report.summary_line());
            },
            Err(_) => all_ok = false,
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).context("simulation failed") {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        },
    }
}
