use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tribeam::{ExecMode, Pairing, QueryConfig, select_with};

#[derive(Debug, Parser)]
#[command(name = "tribeam")]
#[command(about = "Rank groups of T1.a by SUM(x*y*z) over T1 x T2 x T3 where a < b + c.")]
struct Cli {
    /// Table T1 (columns a, x).
    t1: PathBuf,
    /// Table T2 (columns b, y).
    t2: PathBuf,
    /// Table T3 (columns c, z).
    t3: PathBuf,
    /// Result file; replaced only when the query succeeds.
    output: PathBuf,

    /// Run single-threaded.
    #[arg(long, conflicts_with_all = ["threads", "partitions"])]
    sequential: bool,

    /// Worker threads (default: Rayon's global pool).
    #[arg(long)]
    threads: Option<usize>,

    /// Scan partitions (default: 64).
    #[arg(long)]
    partitions: Option<usize>,

    /// Memory budget for the materialized pair, in bytes.
    #[arg(long, default_value_t = tribeam::config::DEFAULT_MEMORY_BUDGET_BYTES)]
    memory_budget: usize,

    /// Materialize this pair instead of the planner's choice: t1t2, t2t3 or t1t3.
    #[arg(long)]
    force_pair: Option<Pairing>,

    /// Number of groups to report.
    #[arg(long, default_value_t = tribeam::topk::DEFAULT_LIMIT)]
    limit: usize,

    /// Save run statistics as JSON.
    #[arg(long)]
    stats: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> QueryConfig {
        let mode = if self.sequential {
            ExecMode::Sequential
        } else {
            ExecMode::Parallel {
                threads: self.threads,
                partitions: self.partitions,
            }
        };
        let cfg = QueryConfig::default()
            .with_mode(mode)
            .with_memory_budget(self.memory_budget)
            .with_limit(self.limit);
        match self.force_pair {
            Some(p) => cfg.with_forced_pairing(p),
            None => cfg,
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let stats = select_with(&cli.config(), &cli.t1, &cli.t2, &cli.t3, &cli.output)?;
    if let Some(path) = &cli.stats {
        stats.save_to_file(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
