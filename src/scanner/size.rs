use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;
use thiserror::Error;

use super::progress::ProgressSink;
use crate::units::Unit;

/// Byte total of a scan, expressed in one display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeMeasurement {
    pub bytes: u64,
    pub files: u64,
    pub unit: Unit,
}

impl SizeMeasurement {
    fn new(bytes: u64, files: u64, unit: Option<Unit>) -> Self {
        Self {
            bytes,
            files,
            unit: unit.unwrap_or_else(|| Unit::best_for(bytes)),
        }
    }

    /// `bytes` converted into `unit`.
    pub fn total_size(&self) -> f64 {
        self.unit.convert(self.bytes)
    }
}

impl fmt::Display for SizeMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.total_size(), self.unit)
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to measure {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to report progress: {0}")]
    Progress(#[source] io::Error),
}

/// Sum the sizes of all regular files below `directory`.
///
/// Symlinks are never counted and symlinked directories are never entered.
/// `unit` pins the display unit; `None` picks the largest unit that fits
/// the running total.
pub fn scan(
    directory: &Path,
    unit: Option<Unit>,
    progress: &mut dyn ProgressSink,
) -> Result<SizeMeasurement, ScanError> {
    if std::fs::symlink_metadata(directory).is_err() {
        return Err(ScanError::NotFound(directory.to_path_buf()));
    }

    let mut total_size = 0u64;
    let mut file_count = 0u64;

    let walker = WalkBuilder::new(directory)
        .standard_filters(false) // count everything, hidden and ignored files included
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            continue;
        }

        if !file_type.is_symlink() {
            match entry.path().symlink_metadata() {
                Ok(metadata) => {
                    total_size += metadata.len();
                    file_count += 1;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    tracing::trace!(path = %entry.path().display(), "file vanished during scan");
                    continue;
                }
                Err(source) => {
                    return Err(ScanError::Io {
                        path: entry.path().to_path_buf(),
                        source,
                    });
                }
            }
        }

        progress
            .update(&SizeMeasurement::new(total_size, file_count, unit))
            .map_err(ScanError::Progress)?;
    }

    let measurement = SizeMeasurement::new(total_size, file_count, unit);
    progress.finish(&measurement).map_err(ScanError::Progress)?;

    tracing::debug!(
        path = %directory.display(),
        size = %bytesize::ByteSize::b(total_size),
        files = file_count,
        "scan complete"
    );

    Ok(measurement)
}
