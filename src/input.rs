//! Locating and reading schema documents on disk

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use tracing::{debug, warn};

use crate::error::{Result, SchemaError};

/// Read a schema file, trying UTF-8 first, then Windows-1252 as fallback.
///
/// A leading byte order mark is removed.
pub fn read_schema_file(path: &Path) -> Result<String> {
    let read_error = |source| SchemaError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let bytes = std::fs::read(path).map_err(read_error)?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                return Err(read_error(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                )));
            }
            debug!(path = %path.display(), "decoded schema file as Windows-1252");
            decoded.into_owned()
        }
    };

    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Expand literal paths and glob patterns into a sorted, de-duplicated file list.
///
/// Literal paths are kept even if they do not exist so that reading them
/// reports the failure; a glob matching nothing contributes nothing.
pub fn expand_inputs<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if pattern.contains(['*', '?', '[']) {
            let paths = glob::glob(pattern).map_err(|source| SchemaError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            let before = files.len();
            files.extend(paths.filter_map(|p| p.ok()).filter(|p| p.is_file()));
            if files.len() == before {
                warn!(pattern, "pattern matched no files");
            }
        } else {
            files.push(PathBuf::from(pattern));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
