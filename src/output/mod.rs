mod console;
mod json;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::Args;
use crate::ledger::validate_case_id;

/// A subdirectory of the base path, named by its case id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub path: PathBuf,
}

pub fn run(args: &Args) -> Result<()> {
    // Reject a bad unit before touching the filesystem
    let unit = args.effective_unit()?;

    if args.json {
        json::run(args, unit)
    } else {
        console::run(args, unit)
    }
}

/// Directories directly under `base`, sorted by name. Symlinks to
/// directories count as cases.
pub fn list_cases(base: &Path) -> io::Result<Vec<Case>> {
    let mut cases = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(id) => cases.push(Case { id, path }),
            Err(name) => tracing::warn!(name = ?name, "skipping case with non UTF-8 name"),
        }
    }
    cases.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(cases)
}

/// Cases whose ids can be stored in the ledger; the rest are logged and skipped.
fn ledger_cases(cases: Vec<Case>) -> impl Iterator<Item = Case> {
    cases.into_iter().filter(|case| match validate_case_id(&case.id) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "skipping case");
            false
        }
    })
}
