use regex::Regex;

/// Remote/on-site classification of a vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkArrangement {
    Remote,
    Local,
    Hybrid,
    Unknown,
}

impl WorkArrangement {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkArrangement::Remote => "remote",
            WorkArrangement::Local => "local",
            WorkArrangement::Hybrid => "hybrid",
            WorkArrangement::Unknown => "unknown",
        }
    }
}

/// Contract category of a vacancy (CLT = Brazilian formal employment,
/// PJ = independent contractor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Clt,
    Pj,
    Unspecified,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Clt => "clt",
            ContractType::Pj => "pj",
            ContractType::Unspecified => "unspecified",
        }
    }
}

pub struct Extractor {
    email_regex: Regex,
    url_regex: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            // Local part + "@" + dotted domain with a 2+ letter extension
            email_regex: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap(),
            // Word-bounded so trailing punctuation stays out of the match
            url_regex: Regex::new(
                r"\bhttps?://(?:www\.)?[a-zA-Z0-9-]+(?:\.[a-zA-Z]{2,})+(?:[^\s]*)?\b",
            )
            .unwrap(),
        }
    }

    /// First email-shaped substring in document order, case preserved.
    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    /// First http(s) URL in document order, case preserved.
    pub fn extract_url(&self, text: &str) -> Option<String> {
        self.url_regex.find(text).map(|m| m.as_str().to_string())
    }

    /// Keyword containment in priority order. `text` must already be
    /// lower-cased by the caller. Every keyword on every branch is a real
    /// containment check, so `Unknown` is reachable whenever none match.
    pub fn classify_work_arrangement(&self, text: &str) -> WorkArrangement {
        if text.contains("remoto") || text.contains("remote") {
            WorkArrangement::Remote
        } else if text.contains("presencial") || text.contains("local") {
            WorkArrangement::Local
        } else if text.contains("hibrido") || text.contains("hybrid") {
            WorkArrangement::Hybrid
        } else {
            WorkArrangement::Unknown
        }
    }

    /// `text` must already be lower-cased by the caller.
    pub fn classify_contract_type(&self, text: &str) -> ContractType {
        if text.contains("clt") {
            ContractType::Clt
        } else if text.contains("pj") {
            ContractType::Pj
        } else {
            ContractType::Unspecified
        }
    }
}
