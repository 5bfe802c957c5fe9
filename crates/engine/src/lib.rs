// crates/engine/src/lib.rs
use rayon::prelude::*;

pub mod chunk;
pub mod config;
pub mod error;
pub mod options;
pub mod processor;
pub mod stats;

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::stats::Summary;

/// Run the full parse-aggregate-merge pipeline over the configured file.
///
/// Plans line-aligned byte ranges, fans them out to a dedicated worker pool,
/// joins on every partial result and merges them into one sorted summary.
/// The result is byte-identical regardless of the worker count.
///
/// # Errors
///
/// Fails fast on the first I/O fault, malformed record or configuration
/// error; no summary is ever produced from an incomplete set of partials.
pub fn run(config: &Config) -> Result<Summary> {
    validate(config)?;

    // Requested parallelism is capped at available hardware parallelism.
    let jobs = config.jobs.min(num_cpus::get()).max(1);
    let ranges = chunk::plan(&config.path, jobs, config.align_window)?;
    log::debug!(
        "dispatching {} chunk(s) of '{}' to {jobs} worker(s)",
        ranges.len(),
        config.path.display()
    );

    // A dedicated pool instead of the global one, sized from config.
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let partials = pool.install(|| {
        ranges
            .par_iter()
            .map(|range| processor::process_chunk(&config.path, *range, config))
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(Summary::from_partials(partials))
}

fn validate(config: &Config) -> Result<()> {
    if config.jobs == 0 {
        return Err(EngineError::Config("jobs must be at least 1".into()));
    }
    if config.buffer_size == 0 {
        return Err(EngineError::Config("buffer size must be non-zero".into()));
    }
    if config.align_window == 0 {
        return Err(EngineError::Config(
            "alignment window must be non-zero".into(),
        ));
    }
    Ok(())
}
