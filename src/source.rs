//! Input collection for the command line
//!
//! The rule engine only sees bytes and a display name. This module turns
//! command line targets (files or directories) into that pair.

use crate::diagnostic::Diagnostic;
use crate::error::{Result, ValidatorError};
use crate::rules::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Expand targets into the list of documents to validate.
///
/// Files are kept as given, even without a YAML extension. Directories are
/// walked recursively for files whose extension is in `extensions`, in
/// sorted order. A directory holding no such file is an error.
pub fn collect_targets(targets: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for target in targets {
        if !target.is_dir() {
            files.push(target.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(target).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                found.push(entry.into_path());
            }
        }

        if found.is_empty() {
            warn!(dir = %target.display(), "no YAML files found");
            return Err(ValidatorError::NoTargets(target.clone()));
        }
        debug!(dir = %target.display(), count = found.len(), "collected documents");
        files.extend(found);
    }

    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Read one file and validate it, labelling diagnostics with its path
pub fn validate_file(validator: &Validator, path: &Path) -> Result<Vec<Diagnostic>> {
    let bytes = std::fs::read(path).map_err(|source| ValidatorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(validator.validate(&bytes, &path.display().to_string()))
}
