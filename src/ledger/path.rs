use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Path recorded in the ledger for a scanned directory.
///
/// A symlinked directory is resolved by exactly one `read_link` hop; the
/// result (or the directory itself) is then made absolute against the
/// working directory. Further links are left alone, so existing ledgers
/// keep matching.
pub fn resolve_real_path(source_dir: &Path) -> io::Result<PathBuf> {
    let is_link = source_dir
        .symlink_metadata()
        .is_ok_and(|metadata| metadata.file_type().is_symlink());

    let target = if is_link {
        source_dir.read_link()?
    } else {
        source_dir.to_path_buf()
    };

    Ok(absolute_from(&env::current_dir()?, &target))
}

/// Join `path` onto `base` and collapse `.` and `..` without touching the
/// filesystem.
pub fn absolute_from(base: &Path, path: &Path) -> PathBuf {
    let joined = base.join(path);
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
