// crates/resolve_snippet_source/src/lib.rs

use std::path::{Path, PathBuf};

use load_snippet_config::{fields, RawConfig};
use snippet_marker::{MarkerPair, MarkerPairError};
use thiserror::Error;

/// Directory, next to the input file, that receives derived output paths.
pub const DEFAULT_OUTPUT_DIR: &str = "snippets";

pub const DEFAULT_SOURCE_NAME: &str = "my-theme";
pub const DEFAULT_AUTHOR: &str = "Unknown Author";
pub const DEFAULT_LICENSE: &str = "MIT";

/// What to do when the output file already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Replace the file entirely on every run.
    #[default]
    Overwrite,
    /// Leave an existing file untouched.
    KeepExisting,
}

/// Descriptive fields carried into the companion document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: Option<String>,
    pub author: Option<String>,
    pub license: Option<String>,
    pub repo_url: Option<String>,
}

impl SourceMetadata {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_SOURCE_NAME)
    }

    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }

    pub fn license(&self) -> &str {
        self.license.as_deref().unwrap_or(DEFAULT_LICENSE)
    }

    pub fn repo_url(&self) -> &str {
        self.repo_url.as_deref().unwrap_or("")
    }
}

/// One fully resolved unit of extraction work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    pub identifier: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub markers: MarkerPair,
    pub overwrite: OverwritePolicy,
    pub metadata: SourceMetadata,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("no input path configured")]
    MissingPath,
    #[error("input file {} does not exist", .0.display())]
    InputNotFound(PathBuf),
    #[error("input file {} cannot be read: {}", .0.display(), .1)]
    InputUnreadable(PathBuf, String),
    #[error("invalid markers: {0}")]
    Markers(#[from] MarkerPairError),
    #[error("OVERWRITE must be true or false, got '{0}'")]
    Overwrite(String),
}

/// A configured source that cannot be processed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("source '{identifier}' is invalid: {reason}")]
pub struct SourceInvalid {
    pub identifier: String,
    #[source]
    pub reason: InvalidReason,
}

/// Turns one configuration group into a [`SourceEntry`].
///
/// Relative paths are taken relative to `base_dir`. The input must exist now;
/// the extractor checks again when it reads the file.
pub fn resolve_source(group: &RawConfig, base_dir: &Path) -> Result<SourceEntry, SourceInvalid> {
    let identifier = group.identifier().to_string();
    let invalid = |reason: InvalidReason| SourceInvalid {
        identifier: identifier.clone(),
        reason,
    };

    let input_path = group
        .get(fields::PATH)
        .filter(|p| !p.is_empty())
        .map(|p| anchor(base_dir, p))
        .ok_or_else(|| invalid(InvalidReason::MissingPath))?;

    if !input_path.exists() {
        return Err(invalid(InvalidReason::InputNotFound(input_path)));
    }

    let output_path = match group.get(fields::OUTPUT_PATH).filter(|p| !p.is_empty()) {
        Some(p) => anchor(base_dir, p),
        None => {
            let derived = default_output_path(&input_path);
            log::debug!(
                "No output path for '{}'; using {}",
                identifier,
                derived.display()
            );
            derived
        }
    };

    let markers = match (group.get(fields::START_MARKER), group.get(fields::END_MARKER)) {
        (None, None) => MarkerPair::default(),
        (start, end) => MarkerPair::new(start.unwrap_or(""), end.unwrap_or(""))
            .map_err(|e| invalid(e.into()))?,
    };

    let overwrite = match group.get(fields::OVERWRITE) {
        None => OverwritePolicy::default(),
        Some(raw) => parse_overwrite(raw).ok_or_else(|| invalid(InvalidReason::Overwrite(raw.to_string())))?,
    };

    let metadata = SourceMetadata {
        name: non_empty(group.get(fields::NAME)),
        author: non_empty(group.get(fields::AUTHOR)),
        license: non_empty(group.get(fields::LICENSE)),
        repo_url: non_empty(group.get(fields::REPO_URL)),
    };

    Ok(SourceEntry {
        identifier,
        input_path,
        output_path,
        markers,
        overwrite,
        metadata,
    })
}

/// Output path used when none is configured: the same file name inside a
/// `snippets` directory next to the input.
///
/// `themes/minimal/theme.css` → `themes/minimal/snippets/theme.css`
pub fn default_output_path(input: &Path) -> PathBuf {
    let file_name = input.file_name().unwrap_or(input.as_os_str());
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    parent.join(DEFAULT_OUTPUT_DIR).join(file_name)
}

/// Parses a boolean-ish flag value (`true/false`, `yes/no`, `1/0`).
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn parse_overwrite(raw: &str) -> Option<OverwritePolicy> {
    parse_flag(raw).map(|overwrite| {
        if overwrite {
            OverwritePolicy::Overwrite
        } else {
            OverwritePolicy::KeepExisting
        }
    })
}

/// Resolves `raw` against `base_dir` unless it is absolute or the base is `.`.
pub fn anchor(base_dir: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() || base_dir == Path::new(".") {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
