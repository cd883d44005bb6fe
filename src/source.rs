//! Loading source files from disk

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load a source file
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the whole file at `path` into an owned string.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source_round_trip() {
        let path = std::env::temp_dir().join(format!("crisp-read-{}.src", std::process::id()));
        fs::write(&path, "int x = 5;\n").unwrap();
        let text = read_source(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(text, "int x = 5;\n");
    }

    #[test]
    fn test_missing_file() {
        let err = read_source("/definitely/not/here.src").unwrap_err();
        match &err {
            SourceError::Io { path, source } => {
                assert_eq!(path, Path::new("/definitely/not/here.src"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
        }
        assert!(err.to_string().starts_with("Failed to read /definitely/not/here.src"));
    }
}
