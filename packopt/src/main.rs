use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use boxpack::util::CancelToken;
use clap::Parser as ClapParser;
use log::{info, warn};
use packopt::config::PackConfig;
use packopt::engine::{Outcome, PackRequest};
use packopt::io::cli::Cli;
use packopt::io::output::PackOutput;
use packopt::progress::Progress;
use packopt::{EPOCH, engine, io};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let mut request: PackRequest = io::read_json(&args.input_file)?;

    match args.config_file {
        None => warn!(
            "[MAIN] No config file provided, using the parameters of the request (use --config-file to override)"
        ),
        Some(config_file) => {
            let config: PackConfig =
                io::read_json(&config_file).context("incorrect config file format")?;
            request.parameters = config;
        }
    }
    if let Some(seed) = args.seed {
        request.parameters.prng_seed = Some(seed);
    }
    info!("[MAIN] Successfully parsed PackConfig: {:?}", request.parameters);

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {}",
                args.solution_folder.display()
            )
        })?;
    }

    let progress = Progress::new(|pct| info!("[MAIN] progress: {pct}%"));
    let outcome = engine::run(&request, CancelToken::new(), progress)?;

    match &outcome {
        Outcome::Single(result) => {
            let stats = result.stats();
            info!(
                "[MAIN] {}: {}/{} items packed, {:.3}% utilization",
                result.algorithm_name.as_deref().unwrap_or("-"),
                stats.packed_count,
                stats.packed_count + stats.unpacked_count,
                result.effective_utilization()
            );
        }
        Outcome::Comparison(comparison) => {
            for (rank, result) in comparison.results.iter().enumerate() {
                info!(
                    "[MAIN] #{} {}: {:.3}% utilization",
                    rank + 1,
                    result.algorithm_name.as_deref().unwrap_or("-"),
                    result.effective_utilization()
                );
            }
        }
    }

    let solution_path = args.solution_folder.join(format!("sol_{input_stem}.json"));
    io::write_json(&PackOutput::new(request, outcome), Path::new(&solution_path))?;

    info!(
        "[MAIN] finished in {:.3}s",
        EPOCH.elapsed().as_secs_f64()
    );
    Ok(())
}
