use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};

use crate::error::FetchError;

const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Raw content of one issue page.
#[derive(Debug, Clone)]
pub struct IssuePage {
    pub index: u32,
    pub author: String,
    pub title: String,
    pub body: String,
}

/// Seam between the pipeline and the remote tracker. Stub implementations
/// stand in for the network in tests.
pub trait IssueFetcher {
    /// Numeric id of the newest issue on the listing page, which doubles
    /// as the total issue count.
    fn fetch_issue_count(&self) -> Result<u32, FetchError>;

    fn fetch_issue(&self, index: u32) -> Result<IssuePage, FetchError>;
}

/// Fetches issue pages from a GitHub issue listing. Issue URLs are the
/// listing URL with the issue number appended.
pub struct GithubFetcher {
    client: Client,
    base_url: String,
}

impl GithubFetcher {
    pub fn new(base_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP_USER_AGENT));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        GithubFetcher {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn get_document(&self, url: &str) -> Result<Html, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = resp.text().map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;
        Ok(Html::parse_document(&html))
    }
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).unwrap();
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join("\n").trim().to_string())
}

impl IssueFetcher for GithubFetcher {
    fn fetch_issue_count(&self) -> Result<u32, FetchError> {
        let document = self.get_document(&self.base_url)?;

        // The newest issue is the first listing row; its element id is
        // "issue_<n>".
        let row_selector = Selector::parse("div.Box-row").unwrap();
        let row = document
            .select(&row_selector)
            .next()
            .ok_or(FetchError::MissingContent {
                url: self.base_url.clone(),
                what: "issue listing row",
            })?;

        let id = row.value().attr("id").ok_or(FetchError::MissingContent {
            url: self.base_url.clone(),
            what: "listing row id",
        })?;

        let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().map_err(|_| FetchError::MissingContent {
            url: self.base_url.clone(),
            what: "numeric issue id",
        })
    }

    fn fetch_issue(&self, index: u32) -> Result<IssuePage, FetchError> {
        let url = format!("{}{}", self.base_url, index);
        let document = self.get_document(&url)?;

        let author = first_text(&document, "a.author").ok_or(FetchError::MissingContent {
            url: url.clone(),
            what: "author link",
        })?;
        let title =
            first_text(&document, "bdi.js-issue-title").ok_or(FetchError::MissingContent {
                url: url.clone(),
                what: "issue title",
            })?;
        let body = first_text(&document, "td.d-block").ok_or(FetchError::MissingContent {
            url: url.clone(),
            what: "issue body",
        })?;

        Ok(IssuePage {
            index,
            author,
            title,
            body,
        })
    }
}
