//! Input discovery: the `*.csv` files directly inside a data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name suffix matched by the `*.csv` pattern.
pub const CSV_SUFFIX: &str = ".csv";

/// List regular files in `dir` whose name ends in `.csv`, sorted by file name.
///
/// Matching is case-sensitive and does not descend into subdirectories.
/// Dot-files are included, directories named `*.csv` are not.
pub fn find_csv_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches_pattern = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(CSV_SUFFIX))
            .unwrap_or(false);

        if !matches_pattern {
            continue;
        }
        if path.is_file() {
            files.push(path);
        } else {
            debug!(path = %path.display(), "Skipping non-file entry matching *.csv");
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
