// crates/extract_snippets/src/orchestrator.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use load_snippet_config::{LoadedConfig, RawConfig};
use marker_block_parser::{MarkerParser, UnterminatedBlock};
use resolve_snippet_source::{resolve_source, InvalidReason, SourceEntry, SourceInvalid};
use thiserror::Error;
use write_snippet_output::{write_blocks, WriteFailure, WriteOutcome};

/// Everything that can go wrong with a single source. None of these stop the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    SourceInvalid(#[from] SourceInvalid),

    #[error("unterminated block in {}: {source}", path.display())]
    UnterminatedBlock {
        path: PathBuf,
        #[source]
        source: UnterminatedBlock,
    },

    #[error(transparent)]
    WriteFailure(#[from] WriteFailure),
}

impl SourceError {
    /// Short name of the failure category, as shown in the summary.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::SourceInvalid(_) => "SourceInvalid",
            SourceError::UnterminatedBlock { .. } => "UnterminatedBlock",
            SourceError::WriteFailure(_) => "WriteFailure",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSuccess {
    pub identifier: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// `(start_line, end_line)` of every block, in file order.
    pub block_ranges: Vec<(usize, usize)>,
    pub outcome: WriteOutcome,
    pub companion_created: Option<PathBuf>,
}

impl SourceSuccess {
    pub fn block_count(&self) -> usize {
        self.block_ranges.len()
    }
}

#[derive(Debug)]
pub struct SourceFailure {
    pub identifier: String,
    pub error: SourceError,
}

/// Outcome of a run, in processing order.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub succeeded: Vec<SourceSuccess>,
    pub failed: Vec<SourceFailure>,
}

impl ExtractionReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failure(&self, identifier: &str) -> Option<&SourceFailure> {
        self.failed.iter().find(|f| f.identifier == identifier)
    }

    pub fn success(&self, identifier: &str) -> Option<&SourceSuccess> {
        self.succeeded.iter().find(|s| s.identifier == identifier)
    }
}

/// Processes every group of `config`, in order. A failing source is recorded
/// and the next one is attempted.
pub fn extract_all(config: &LoadedConfig) -> ExtractionReport {
    let mut report = ExtractionReport::default();
    for group in &config.groups {
        match process_group(group, &config.base_dir) {
            Ok(success) => {
                log::info!(
                    "Source '{}': {} block(s) → {}",
                    success.identifier,
                    success.block_count(),
                    success.output_path.display()
                );
                report.succeeded.push(success);
            }
            Err(error) => {
                log::warn!("Source '{}' failed: {}", group.identifier(), error);
                report.failed.push(SourceFailure {
                    identifier: group.identifier().to_string(),
                    error,
                });
            }
        }
    }
    report
}

fn process_group(group: &RawConfig, base_dir: &Path) -> Result<SourceSuccess, SourceError> {
    let entry = resolve_source(group, base_dir)?;
    process_entry(&entry)
}

/// Reads, parses and writes one resolved source.
///
/// The input is read again here even though resolution already saw it, since
/// it may have changed in between. Blocks are only written once the whole file
/// parsed, so an unterminated block leaves the output untouched.
pub fn process_entry(entry: &SourceEntry) -> Result<SourceSuccess, SourceError> {
    log::debug!(
        "Processing '{}' from {}",
        entry.identifier,
        entry.input_path.display()
    );
    let text = fs::read_to_string(&entry.input_path).map_err(|err| {
        let reason = if err.kind() == io::ErrorKind::NotFound {
            InvalidReason::InputNotFound(entry.input_path.clone())
        } else {
            InvalidReason::InputUnreadable(entry.input_path.clone(), err.to_string())
        };
        SourceInvalid {
            identifier: entry.identifier.clone(),
            reason,
        }
    })?;

    let blocks = MarkerParser::new(&text, &entry.markers)
        .parse_all()
        .map_err(|source| SourceError::UnterminatedBlock {
            path: entry.input_path.clone(),
            source,
        })?;
    if blocks.is_empty() {
        log::warn!("No blocks found in {}", entry.input_path.display());
    }

    let block_ranges = blocks.iter().map(|b| (b.start_line, b.end_line)).collect();
    let report = write_blocks(entry, blocks)?;

    Ok(SourceSuccess {
        identifier: entry.identifier.clone(),
        input_path: entry.input_path.clone(),
        output_path: entry.output_path.clone(),
        block_ranges,
        outcome: report.outcome,
        companion_created: report.companion_created,
    })
}
