pub mod coordinator;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod logger;
pub mod processor;
pub mod sink;

// Exporting types for convenience
pub use coordinator::{run_batch, BatchResult, IssueFailure};
pub use error::{BatchError, FetchError, PersistenceError};
pub use extractor::{ContractType, Extractor, WorkArrangement};
pub use fetcher::{GithubFetcher, IssueFetcher, IssuePage};
pub use processor::{ExtractedRecord, IssueProcessor};
pub use sink::PersistenceSink;
