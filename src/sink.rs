use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::PersistenceError;
use crate::processor::ExtractedRecord;

const RECORD_FILE: &str = "data.csv";
const EMAIL_FILE: &str = "emails.txt";
const RECORD_HEADER: [&str; 6] = [
    "user",
    "title",
    "email",
    "work_form_result",
    "work_type_result",
    "text_url",
];

// Downstream consumers expect the literal "None" for absent fields.
const ABSENT_FIELD: &str = "None";

/// Owns the record store and the email store for the lifetime of a run.
/// Appends and flushes are safe under concurrent workers.
pub struct PersistenceSink {
    record_path: PathBuf,
    email_path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
    emails: Mutex<HashSet<String>>,
}

impl PersistenceSink {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, PersistenceError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| PersistenceError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let record_path = dir.join(RECORD_FILE);
        let email_path = dir.join(EMAIL_FILE);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&record_path)
            .map_err(|e| PersistenceError::Io {
                path: record_path.clone(),
                source: e,
            })?;
        let writer = csv::WriterBuilder::new().from_writer(file);

        Ok(PersistenceSink {
            record_path,
            email_path,
            writer: Mutex::new(writer),
            emails: Mutex::new(HashSet::new()),
        })
    }

    /// Truncates both stores and writes the record-store header. Must run
    /// once at the start of a batch, before any append.
    pub fn reset_stores(&self) -> Result<(), PersistenceError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.record_path)
            .map_err(|e| PersistenceError::Io {
                path: self.record_path.clone(),
                source: e,
            })?;

        let mut writer = csv::WriterBuilder::new().from_writer(file);
        writer
            .write_record(RECORD_HEADER)
            .map_err(|e| PersistenceError::Csv {
                path: self.record_path.clone(),
                source: e,
            })?;
        writer.flush().map_err(|e| PersistenceError::Io {
            path: self.record_path.clone(),
            source: e,
        })?;
        *self.writer.lock().unwrap() = writer;

        File::create(&self.email_path).map_err(|e| PersistenceError::Io {
            path: self.email_path.clone(),
            source: e,
        })?;
        self.emails.lock().unwrap().clear();
        Ok(())
    }

    /// Appends one record as a CSV line. Flushed immediately so an
    /// interrupted run leaves only complete lines behind.
    pub fn append_record(&self, record: &ExtractedRecord) -> Result<(), PersistenceError> {
        let mut writer = self.writer.lock().unwrap();
        writer
            .write_record([
                record.author.as_str(),
                record.title.as_str(),
                record.email.as_deref().unwrap_or(ABSENT_FIELD),
                record.work_arrangement.as_str(),
                record.contract_type.as_str(),
                record.url.as_deref().unwrap_or(ABSENT_FIELD),
            ])
            .map_err(|e| PersistenceError::Csv {
                path: self.record_path.clone(),
                source: e,
            })?;
        writer.flush().map_err(|e| PersistenceError::Io {
            path: self.record_path.clone(),
            source: e,
        })
    }

    /// Duplicates collapse by exact string equality, case-sensitive.
    pub fn record_email(&self, email: &str) {
        self.emails.lock().unwrap().insert(email.to_string());
    }

    /// Rewrites the email store wholesale: one line per distinct email,
    /// set iteration order.
    pub fn flush_emails(&self) -> Result<(), PersistenceError> {
        let emails = self.emails.lock().unwrap();
        let mut file = File::create(&self.email_path).map_err(|e| PersistenceError::Io {
            path: self.email_path.clone(),
            source: e,
        })?;
        for email in emails.iter() {
            writeln!(file, "{}", email).map_err(|e| PersistenceError::Io {
                path: self.email_path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ContractType, WorkArrangement};

    fn record(index: u32) -> ExtractedRecord {
        ExtractedRecord {
            index,
            author: format!("user{}", index),
            title: format!("Vaga {}", index),
            email: Some(format!("dev{}@example.com", index)),
            work_arrangement: WorkArrangement::Remote,
            contract_type: ContractType::Clt,
            url: None,
        }
    }

    #[test]
    fn reset_leaves_header_only_and_empty_email_store() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PersistenceSink::open(dir.path()).unwrap();

        sink.append_record(&record(1)).unwrap();
        sink.record_email("dev1@example.com");
        sink.reset_stores().unwrap();
        sink.flush_emails().unwrap();

        let csv = std::fs::read_to_string(dir.path().join(RECORD_FILE)).unwrap();
        assert_eq!(csv, "user,title,email,work_form_result,work_type_result,text_url\n");
        let emails = std::fs::read_to_string(dir.path().join(EMAIL_FILE)).unwrap();
        assert_eq!(emails, "");
    }

    #[test]
    fn absent_fields_render_as_none_token() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PersistenceSink::open(dir.path()).unwrap();
        sink.reset_stores().unwrap();

        sink.append_record(&ExtractedRecord {
            index: 1,
            author: "joao".to_string(),
            title: "Analista de Dados".to_string(),
            email: None,
            work_arrangement: WorkArrangement::Unknown,
            contract_type: ContractType::Unspecified,
            url: None,
        })
        .unwrap();

        let csv = std::fs::read_to_string(dir.path().join(RECORD_FILE)).unwrap();
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, "joao,Analista de Dados,None,unknown,unspecified,None");
    }

    #[test]
    fn comma_in_title_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PersistenceSink::open(dir.path()).unwrap();
        sink.reset_stores().unwrap();

        let mut rec = record(1);
        rec.title = "Engenheiro, Pleno".to_string();
        sink.append_record(&rec).unwrap();

        let csv = std::fs::read_to_string(dir.path().join(RECORD_FILE)).unwrap();
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "user1,\"Engenheiro, Pleno\",dev1@example.com,remote,clt,None"
        );
    }

    #[test]
    fn flush_emails_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PersistenceSink::open(dir.path()).unwrap();
        sink.reset_stores().unwrap();

        sink.record_email("rh@empresa.com.br");
        sink.record_email("rh@empresa.com.br");
        sink.record_email("talentos@outra.io");
        sink.flush_emails().unwrap();

        let emails = std::fs::read_to_string(dir.path().join(EMAIL_FILE)).unwrap();
        let mut lines: Vec<&str> = emails.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["rh@empresa.com.br", "talentos@outra.io"]);
    }

    #[test]
    fn emails_dedup_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let sink = PersistenceSink::open(dir.path()).unwrap();
        sink.reset_stores().unwrap();

        sink.record_email("RH@empresa.com.br");
        sink.record_email("rh@empresa.com.br");
        sink.flush_emails().unwrap();

        let emails = std::fs::read_to_string(dir.path().join(EMAIL_FILE)).unwrap();
        assert_eq!(emails.lines().count(), 2);
    }
}
