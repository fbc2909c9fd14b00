use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use log::{error, info, warn};

use vagas_scraper_lib::{logger, run_batch, GithubFetcher, PersistenceSink};

const ISSUES_URL: &str = "https://github.com/datascience-br/vagas/issues/";
const OUTPUT_DIR: &str = "data";

fn main() -> ExitCode {
    logger::init();
    info!("Starting vagas scraper...");

    let sink = match PersistenceSink::open(OUTPUT_DIR) {
        Ok(sink) => sink,
        Err(e) => {
            error!("Cannot open output stores: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = sink.reset_stores() {
        error!("Cannot reset output stores: {}", e);
        return ExitCode::FAILURE;
    }

    let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    info!("Using {} workers", workers);

    let fetcher = GithubFetcher::new(ISSUES_URL);
    let started = Instant::now();

    match run_batch(&fetcher, &sink, workers) {
        Ok(result) => {
            if !result.failures.is_empty() {
                let indices: Vec<String> = result
                    .failures
                    .iter()
                    .map(|f| f.index.to_string())
                    .collect();
                warn!(
                    "{} issues failed: {}",
                    result.failures.len(),
                    indices.join(", ")
                );
            }
            info!(
                "Processed {} / {} issues in {:.2?}",
                result.completed,
                result.total_issues,
                started.elapsed()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Batch aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
