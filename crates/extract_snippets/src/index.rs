// crates/extract_snippets/src/index.rs

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::orchestrator::ExtractionReport;

/// Maps `<identifier>_<input file name>_<start>_<end>` to the output path the
/// block was written to. Keys are kept sorted so the file is stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetIndex(pub BTreeMap<String, String>);

impl SnippetIndex {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot write index {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot serialise index: {0}")]
    Json(#[from] serde_json::Error),
}

/// Builds the index from the successful sources of a run.
pub fn build_index(report: &ExtractionReport) -> SnippetIndex {
    let mut entries = BTreeMap::new();
    for success in &report.succeeded {
        let file_name = success
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for (start, end) in &success.block_ranges {
            entries.insert(
                format!("{}_{}_{}_{}", success.identifier, file_name, start, end),
                success.output_path.display().to_string(),
            );
        }
    }
    SnippetIndex(entries)
}

/// Writes the index for `report` to `path` as pretty-printed JSON, replacing
/// any previous index.
pub fn write_index(path: &Path, report: &ExtractionReport) -> Result<SnippetIndex, IndexError> {
    let index = build_index(report);
    let json = serde_json::to_string_pretty(&index)?;
    let io_err = |source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, json + "\n").map_err(io_err)?;
    Ok(index)
}
