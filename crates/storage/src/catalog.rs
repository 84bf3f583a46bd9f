//! Loading the question catalog from JSON files.
//!
//! Each `*.json` file in the catalog directory is one source: its file stem
//! is the source key and its body is an array of questions.

use std::fs;
use std::path::{Path, PathBuf};

use quiz_core::model::{Question, QuestionCatalog, SourceKey};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid question file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("file name is not a valid source key: {path}")]
    InvalidSourceName { path: PathBuf },
}

/// Load every `*.json` file under `dir` as a catalog source, ordered by file name.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the directory or a file cannot be read, or a
/// file does not hold a valid question array.
pub fn load_catalog_dir(dir: &Path) -> Result<QuestionCatalog, CatalogLoadError> {
    let io_err = |source| CatalogLoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let key = source_key_for(&path)?;
        let questions = load_source_file(&path)?;
        tracing::debug!(source = %key, questions = questions.len(), "loaded catalog source");
        sources.push((key, questions));
    }

    Ok(QuestionCatalog::new(sources))
}

/// Load a single source file.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or parsed.
pub fn load_source_file(path: &Path) -> Result<Vec<Question>, CatalogLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn source_key_for(path: &Path) -> Result<SourceKey, CatalogLoadError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(SourceKey::from)
        .ok_or_else(|| CatalogLoadError::InvalidSourceName {
            path: path.to_path_buf(),
        })
}
