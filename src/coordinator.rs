use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use std::thread;

use log::{info, warn};

use crate::error::{BatchError, FetchError};
use crate::fetcher::IssueFetcher;
use crate::processor::IssueProcessor;
use crate::sink::PersistenceSink;

#[derive(Debug)]
pub struct IssueFailure {
    pub index: u32,
    pub error: FetchError,
}

#[derive(Debug)]
pub struct BatchResult {
    pub total_issues: u32,
    pub completed: u32,
    pub failures: Vec<IssueFailure>,
}

/// Discovers the issue count, fans indices out across `workers` threads,
/// and streams completed records into the sink. A pool of 1 gives
/// sequential semantics. A single issue's fetch failure never aborts its
/// siblings; count discovery and persistence failures abort the run.
pub fn run_batch<F>(
    fetcher: &F,
    sink: &PersistenceSink,
    workers: usize,
) -> Result<BatchResult, BatchError>
where
    F: IssueFetcher + Sync,
{
    let total = fetcher
        .fetch_issue_count()
        .map_err(BatchError::CountDiscovery)?;
    info!("Listing reports {} issues", total);

    let processor = IssueProcessor::new(fetcher);
    let next_index = AtomicU32::new(1);
    let stop = AtomicBool::new(false);
    let failures: Mutex<Vec<IssueFailure>> = Mutex::new(Vec::new());
    let sink_error = Mutex::new(None);

    thread::scope(|scope| {
        for _ in 0..workers.max(1) {
            scope.spawn(|| loop {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let index = next_index.fetch_add(1, Ordering::Relaxed);
                if index > total {
                    break;
                }

                match processor.process(index) {
                    Ok(record) => {
                        if let Some(email) = record.email.as_deref() {
                            sink.record_email(email);
                        }
                        // Append as soon as the record exists so partial
                        // progress survives a mid-run crash.
                        if let Err(e) = sink.append_record(&record) {
                            *sink_error.lock().unwrap() = Some(e);
                            stop.store(true, Ordering::Relaxed);
                            break;
                        }
                        info!("Issue {}: {}", index, record.title);
                    }
                    Err(error) => {
                        warn!("Issue {} failed: {}", index, error);
                        failures.lock().unwrap().push(IssueFailure { index, error });
                    }
                }
            });
        }
    });

    if let Some(error) = sink_error.into_inner().unwrap() {
        return Err(BatchError::Persistence(error));
    }

    sink.flush_emails()?;

    let mut failures = failures.into_inner().unwrap();
    failures.sort_by_key(|f| f.index);
    let completed = total - failures.len() as u32;

    Ok(BatchResult {
        total_issues: total,
        completed,
        failures,
    })
}
