//! Append-only CSV score ledger.
//!
//! Header `Roll,Name,Class,Subject,Score,Total,Timestamp` is written only when
//! the file is created. A field is quoted (inner quotes doubled) iff it
//! contains a comma or a quote.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::atomic::write_atomically;
use crate::error::LedgerError;

pub const HEADER: &str = "Roll,Name,Class,Subject,Score,Total,Timestamp";

const FIELD_COUNT: usize = 7;

/// One completed (or manually entered) attempt, ready to append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRecord {
    pub roll: String,
    pub name: String,
    pub class: String,
    pub subject: String,
    pub score: u32,
    pub total: u32,
    pub timestamp: String,
}

impl ScoreRecord {
    /// Timestamp for new records: local time, RFC 3339.
    pub fn now_timestamp() -> String {
        Local::now().to_rfc3339()
    }

    fn to_line(&self) -> String {
        [
            escape_field(&self.roll),
            escape_field(&self.name),
            escape_field(&self.class),
            escape_field(&self.subject),
            self.score.to_string(),
            self.total.to_string(),
            escape_field(&self.timestamp),
        ]
        .join(",")
    }
}

/// Untrusted manual entry; score and total are still text.
#[derive(Debug, Clone, Default)]
pub struct ScoreInput {
    pub roll: String,
    pub name: String,
    pub class: String,
    pub subject: String,
    pub score: String,
    pub total: String,
}

impl ScoreInput {
    /// Validate into a record stamped with the current time.
    pub fn into_record(self) -> Result<ScoreRecord, LedgerError> {
        let roll = non_empty(self.roll, "roll")?;
        let name = non_empty(self.name, "name")?;
        let class = non_empty(self.class, "class")?;
        let subject = non_empty(self.subject, "subject")?;
        let score = parse_count(&self.score, "score")?;
        let total = parse_count(&self.total, "total")?;
        Ok(ScoreRecord {
            roll,
            name,
            class,
            subject,
            score,
            total,
            timestamp: ScoreRecord::now_timestamp(),
        })
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, LedgerError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(LedgerError::Validation(field));
    }
    Ok(value)
}

fn parse_count(value: &str, field: &'static str) -> Result<u32, LedgerError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| LedgerError::InvalidInput {
            field,
            value: value.to_string(),
        })
}

/// A decoded ledger row. Fields stay textual since the file may have been
/// edited by hand; short rows are padded with empty fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRow {
    pub roll: String,
    pub name: String,
    pub class: String,
    pub subject: String,
    pub score: String,
    pub total: String,
    pub timestamp: String,
}

impl ScoreRow {
    fn from_fields(mut fields: Vec<String>) -> Self {
        fields.resize(FIELD_COUNT, String::new());
        let mut it = fields.into_iter();
        let mut next = || it.next().unwrap_or_default();
        Self {
            roll: next(),
            name: next(),
            class: next(),
            subject: next(),
            score: next(),
            total: next(),
            timestamp: next(),
        }
    }
}

/// File-backed score ledger.
#[derive(Debug, Clone)]
pub struct ScoreLedger {
    path: PathBuf,
}

impl ScoreLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new.
    pub fn add(&self, record: &ScoreRecord) -> Result<(), LedgerError> {
        let io_err = |source| LedgerError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        let is_new = file.metadata().map_err(io_err)?.len() == 0;

        let mut chunk = String::new();
        if is_new {
            chunk.push_str(HEADER);
            chunk.push('\n');
        }
        chunk.push_str(&record.to_line());
        chunk.push('\n');
        file.write_all(chunk.as_bytes()).map_err(io_err)?;

        tracing::info!(roll = %record.roll, subject = %record.subject, "score recorded");
        Ok(())
    }

    /// Validate manual input and append it. Nothing is written on failure.
    pub fn add_input(&self, input: ScoreInput) -> Result<ScoreRecord, LedgerError> {
        let record = input.into_record()?;
        self.add(&record)?;
        Ok(record)
    }

    /// All rows in file order, header and blank lines excluded.
    pub fn query(&self) -> Result<Vec<ScoreRow>, LedgerError> {
        let Some(content) = self.read()? else {
            return Ok(Vec::new());
        };
        let mut rows = Vec::new();
        let mut seen_first = false;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if !seen_first {
                seen_first = true;
                if is_header(line) {
                    continue;
                }
            }
            rows.push(ScoreRow::from_fields(split_line(line)));
        }
        Ok(rows)
    }

    /// Remove every row whose decoded first field equals `roll`. Returns the
    /// number of rows removed. The file is replaced atomically.
    pub fn delete_by_key(&self, roll: &str) -> Result<usize, LedgerError> {
        let Some(content) = self.read()? else {
            return Ok(0);
        };
        let mut kept = String::new();
        let mut removed = 0;
        let mut seen_first = false;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let header = !seen_first && is_header(line);
            seen_first = true;
            if !header && first_field(line) == roll {
                removed += 1;
                continue;
            }
            kept.push_str(line);
            kept.push('\n');
        }

        write_atomically(&self.path, kept.as_bytes()).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(roll, removed, "scores deleted");
        Ok(removed)
    }

    /// Remove the backing file. The next `add` recreates it with a header.
    pub fn delete_all(&self) -> Result<(), LedgerError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("score ledger cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LedgerError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn read(&self) -> Result<Option<String>, LedgerError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LedgerError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

fn is_header(line: &str) -> bool {
    line.trim_start().to_lowercase().starts_with("roll,")
}

/// Quote a field iff it contains a comma or a quote.
pub fn escape_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Split one CSV line, honoring quotes and doubled quotes.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(ch),
        }
    }
    fields.push(cur);
    fields
}

fn first_field(line: &str) -> String {
    split_line(line.trim()).into_iter().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(roll: &str, name: &str) -> ScoreRecord {
        ScoreRecord {
            roll: roll.into(),
            name: name.into(),
            class: "7A".into(),
            subject: "Physics".into(),
            score: 3,
            total: 5,
            timestamp: "2026-01-01T10:00:00+00:00".into(),
        }
    }

    fn ledger() -> (tempfile::TempDir, ScoreLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ScoreLedger::new(dir.path().join("scores.csv"));
        (dir, ledger)
    }

    #[test]
    fn header_written_once() {
        let (_dir, ledger) = ledger();
        ledger.add(&record("1", "Ana")).unwrap();
        ledger.add(&record("2", "Ben")).unwrap();
        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(content.matches(HEADER).count(), 1);
        assert!(content.starts_with(HEADER));
        assert_eq!(ledger.query().unwrap().len(), 2);
    }

    #[test]
    fn quoting_rule() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn special_characters_survive_add_and_query() {
        let (_dir, ledger) = ledger();
        let name = "O\"Neil, Jr.";
        ledger.add(&record("1", name)).unwrap();
        let rows = ledger.query().unwrap();
        assert_eq!(rows[0].name, name);
        assert_eq!(rows[0].timestamp, "2026-01-01T10:00:00+00:00");
    }

    #[test]
    fn query_tolerates_blank_lines_and_short_rows() {
        let (_dir, ledger) = ledger();
        std::fs::write(ledger.path(), format!("{HEADER}\n\n1,Ana\n\n")).unwrap();
        let rows = ledger.query().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].roll, "1");
        assert_eq!(rows[0].timestamp, "");
    }

    #[test]
    fn delete_by_key_compares_decoded_first_field() {
        let (_dir, ledger) = ledger();
        ledger.add(&record("1,a", "Ana")).unwrap();
        ledger.add(&record("2", "Ben")).unwrap();
        ledger.add(&record("1,a", "Ana again")).unwrap();
        ledger.add(&record("3", "Cy")).unwrap();
        let before = ledger.query().unwrap();

        let removed = ledger.delete_by_key("1,a").unwrap();
        assert_eq!(removed, 2);

        let after = ledger.query().unwrap();
        assert!(after.iter().all(|r| r.roll != "1,a"));
        let expected: Vec<_> = before.into_iter().filter(|r| r.roll != "1,a").collect();
        assert_eq!(after, expected);
        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert!(content.starts_with(HEADER));
    }

    #[test]
    fn row_with_header_like_roll_can_be_deleted() {
        let (_dir, ledger) = ledger();
        ledger.add(&record("1", "Ana")).unwrap();
        ledger.add(&record("Roll", "Ben")).unwrap();
        assert_eq!(ledger.query().unwrap().len(), 2);

        assert_eq!(ledger.delete_by_key("Roll").unwrap(), 1);
        let rolls: Vec<_> = ledger.query().unwrap().into_iter().map(|r| r.roll).collect();
        assert_eq!(rolls, ["1"]);
        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert!(content.starts_with(HEADER));
    }

    #[test]
    fn delete_all_then_add_recreates_header() {
        let (_dir, ledger) = ledger();
        ledger.add(&record("1", "Ana")).unwrap();
        ledger.delete_all().unwrap();
        assert!(!ledger.path().exists());
        assert!(ledger.query().unwrap().is_empty());
        ledger.delete_all().unwrap();

        ledger.add(&record("2", "Ben")).unwrap();
        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert!(content.starts_with(HEADER));
    }

    #[test]
    fn non_integer_input_leaves_file_untouched() {
        let (_dir, ledger) = ledger();
        let input = ScoreInput {
            roll: "1".into(),
            name: "Ana".into(),
            class: "7A".into(),
            subject: "Physics".into(),
            score: "ten".into(),
            total: "10".into(),
        };
        let err = ledger.add_input(input).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput { field: "score", .. }));
        assert!(!ledger.path().exists());
    }

    #[test]
    fn manual_input_is_recorded() {
        let (_dir, ledger) = ledger();
        let record = ledger
            .add_input(ScoreInput {
                roll: " 9 ".into(),
                name: "Dee".into(),
                class: "8B".into(),
                subject: "Biology".into(),
                score: "4".into(),
                total: "5".into(),
            })
            .unwrap();
        assert_eq!(record.roll, "9");
        let rows = ledger.query().unwrap();
        assert_eq!(rows[0].score, "4");
        assert_eq!(rows[0].total, "5");
    }
}
