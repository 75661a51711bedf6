//! Error types for loading the accident dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures while reading the source CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open accident data file '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in '{path}'{}: {source}", line_suffix(.line))]
    Parse {
        path: PathBuf,
        line: Option<u64>,
        #[source]
        source: csv::Error,
    },
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(l) => format!(" at line {l}"),
        None => String::new(),
    }
}

impl LoadError {
    pub(crate) fn parse(path: &std::path::Path, source: csv::Error) -> Self {
        let line = source.position().map(|p| p.line());
        LoadError::Parse {
            path: path.to_path_buf(),
            line,
            source,
        }
    }
}
