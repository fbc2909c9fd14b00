use crate::error::FetchError;
use crate::extractor::{ContractType, Extractor, WorkArrangement};
use crate::fetcher::IssueFetcher;

/// Normalized result of processing one issue. Built once, appended to the
/// record store exactly once.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExtractedRecord {
    pub index: u32,
    pub author: String,
    pub title: String,
    pub email: Option<String>,
    pub work_arrangement: WorkArrangement,
    pub contract_type: ContractType,
    pub url: Option<String>,
}

/// Runs one fetch + extraction cycle per issue index. Persistence is the
/// caller's job, which keeps this testable against a stub fetcher.
pub struct IssueProcessor<'a, F> {
    fetcher: &'a F,
    extractor: Extractor,
}

impl<'a, F: IssueFetcher> IssueProcessor<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        IssueProcessor {
            fetcher,
            extractor: Extractor::new(),
        }
    }

    pub fn process(&self, index: u32) -> Result<ExtractedRecord, FetchError> {
        let page = self.fetcher.fetch_issue(index)?;

        // Classification keywords are matched on the lower-cased body;
        // email and URL come from the original body so their case survives.
        let lowered = page.body.to_lowercase();

        Ok(ExtractedRecord {
            index: page.index,
            email: self.extractor.extract_email(&page.body),
            url: self.extractor.extract_url(&page.body),
            work_arrangement: self.extractor.classify_work_arrangement(&lowered),
            contract_type: self.extractor.classify_contract_type(&lowered),
            author: page.author,
            title: page.title,
        })
    }
}
