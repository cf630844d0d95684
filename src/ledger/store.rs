use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::record::{parse_line, LedgerRecord, ParsedLine};

/// Latest record per case id, kept in ascending case-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: BTreeMap<String, LedgerRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub ledger: Ledger,
    /// Lines dropped because they did not parse as records.
    pub malformed: usize,
}

impl Ledger {
    /// Read a ledger file. A missing file is an empty ledger.
    pub fn load(path: &Path) -> io::Result<LoadReport> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(LoadReport::default());
            }
            Err(err) => return Err(err),
        };
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> LoadReport {
        let mut report = LoadReport::default();
        for (index, line) in contents.lines().enumerate() {
            match parse_line(line) {
                ParsedLine::Record(record) => report.ledger.upsert(record),
                ParsedLine::Blank => {}
                ParsedLine::Malformed(reason) => {
                    tracing::trace!(line = index + 1, reason, "dropping ledger line");
                    report.malformed += 1;
                }
            }
        }
        report
    }

    pub fn upsert(&mut self, record: LedgerRecord) {
        self.records.insert(record.case_id.clone(), record);
    }

    pub fn records(&self) -> impl Iterator<Item = &LedgerRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in self.records() {
            out.push_str(&record.to_line());
            out.push('\n');
        }
        out
    }

    /// Replace the file at `path` with this ledger.
    ///
    /// Writes to a sibling temp file and renames it into place, so a crash
    /// leaves either the old ledger or the new one.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(self.render().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}
