use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use ferrous_pairhmm::core::compute::simd_abstraction::simd::{
    detect_optimal_simd_engine, simd_engine_description,
};
use ferrous_pairhmm::io::TestCaseReader;
use ferrous_pairhmm::{PairHmm, TestCase};

#[derive(Parser)]
#[command(name = "ferrous-pairhmm")]
#[command(about = "PairHMM genotype-likelihood evaluator (Rust implementation)", long_about = None)]
#[command(version)]
struct Cli {
    /// Input test-case file (reads stdin when omitted)
    #[arg(value_name = "TESTCASES")]
    input: Option<PathBuf>,

    /// Number of threads (default: all available cores)
    #[arg(short = 't', long, value_name = "INT")]
    threads: Option<usize>,

    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value = "3")]
    verbosity: i32,
}

fn main() {
    let cli = Cli::parse();

    // Map verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace)
    // to Rust log levels
    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&cli) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut num_threads = cli.threads.unwrap_or_else(num_cpus::get);
    if num_threads < 1 {
        log::warn!("Invalid thread count {}, using 1 thread", num_threads);
        num_threads = 1;
    }
    let max_threads = num_cpus::get() * 2;
    if num_threads > max_threads {
        log::warn!(
            "Thread count {} exceeds recommended maximum {}, capping at {}",
            num_threads,
            max_threads,
            max_threads
        );
        num_threads = max_threads;
    }

    if num_threads > 1 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            log::warn!(
                "Failed to configure thread pool: {} (may already be initialized)",
                e
            );
        }
    }

    log::info!(
        "Backend: {}",
        simd_engine_description(detect_optimal_simd_engine())
    );

    let batches = match &cli.input {
        Some(path) => {
            log::info!("Reading test cases from {}", path.display());
            let reader = TestCaseReader::from_path(path)
                .with_context(|| format!("Error opening {}", path.display()))?;
            collect_batches(reader)?
        }
        None => {
            log::info!("Reading test cases from stdin");
            let stdin = io::stdin();
            collect_batches(TestCaseReader::new(BufReader::new(stdin.lock())))?
        }
    };

    let n_pairs: usize = batches.iter().map(|b| b.len()).sum();
    log::info!("{} batches, {} pairs", batches.len(), n_pairs);

    let compute_start = Instant::now();
    let results: Vec<Vec<f64>> = if num_threads > 1 {
        batches
            .par_iter()
            .map_init(PairHmm::new, |hmm, batch| hmm.compute_likelihoods(batch))
            .collect()
    } else {
        let mut hmm = PairHmm::new();
        batches
            .iter()
            .map(|batch| hmm.compute_likelihoods(batch))
            .collect()
    };
    let compute_ms = compute_start.elapsed().as_secs_f64() * 1000.0;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    for likelihood in results.iter().flatten() {
        writeln!(writer, "{likelihood:.6}").context("Error writing results")?;
    }
    writer.flush().context("Error flushing results")?;

    log::info!("Computed {} likelihoods in {:.3} ms", n_pairs, compute_ms);
    Ok(())
}

fn collect_batches<R: BufRead>(reader: TestCaseReader<R>) -> Result<Vec<Vec<TestCase>>> {
    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch.context("Error parsing test cases")?);
    }
    Ok(batches)
}
