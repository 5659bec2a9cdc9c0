// crates/write_snippet_output/src/lib.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use marker_block_parser::SnippetBlock;
use resolve_snippet_source::{OverwritePolicy, SourceEntry};
use thiserror::Error;

/// Placed between consecutive blocks of the same source: one blank line.
pub const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Error)]
#[error("cannot write {}: {source}", path.display())]
pub struct WriteFailure {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// What happened to the output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was (re)written with this many bytes.
    Written { bytes: usize },
    /// The file already existed and the source asked to keep it.
    KeptExisting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteReport {
    pub outcome: WriteOutcome,
    /// Set when a companion document was created on this run.
    pub companion_created: Option<PathBuf>,
}

/// Joins the blocks of one source in file order, a blank line between blocks,
/// without a trailing newline.
pub fn render_blocks(blocks: &[SnippetBlock]) -> String {
    blocks
        .iter()
        .map(SnippetBlock::text)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Writes the blocks of `entry` to its output path and creates the companion
/// document if there is none yet.
///
/// The blocks are consumed. With [`OverwritePolicy::Overwrite`] the output is
/// replaced entirely, so unchanged input always produces identical bytes. A
/// source without blocks produces an empty file.
///
/// The companion document is written first. If that fails the output is not
/// touched, so a `WriteFailure` never leaves a freshly written output behind.
/// The reverse can happen: a companion created just before the output write
/// fails stays on disk.
pub fn write_blocks(entry: &SourceEntry, blocks: Vec<SnippetBlock>) -> Result<WriteReport, WriteFailure> {
    let output = &entry.output_path;
    let fail = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| WriteFailure { path, source }
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(fail(parent))?;
    }

    let companion_created = match companion_path(output) {
        Some(doc) if !doc.exists() => {
            fs::write(&doc, render_companion(entry)).map_err(fail(&doc))?;
            log::debug!("Created companion document {}", doc.display());
            Some(doc)
        }
        _ => None,
    };

    let outcome = if entry.overwrite == OverwritePolicy::KeepExisting && output.exists() {
        log::debug!("Keeping existing {}", output.display());
        WriteOutcome::KeptExisting
    } else {
        let rendered = render_blocks(&blocks);
        fs::write(output, &rendered).map_err(fail(output))?;
        WriteOutcome::Written {
            bytes: rendered.len(),
        }
    };

    Ok(WriteReport {
        outcome,
        companion_created,
    })
}

/// Markdown document path next to `output`, unless `output` is itself markdown.
pub fn companion_path(output: &Path) -> Option<PathBuf> {
    let is_markdown = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false);
    if is_markdown || output.file_stem().is_none() {
        None
    } else {
        Some(output.with_extension("md"))
    }
}

/// Front matter, title and a link back to the extracted file.
pub fn render_companion(entry: &SourceEntry) -> String {
    let output = &entry.output_path;
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("snippet");
    let file_name = output
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(stem);
    let meta = &entry.metadata;

    format!(
        "---\n\
         author: {author}\n\
         source: {source}\n\
         license: {license}\n\
         ---\n\
         \n\
         # {title}\n\
         \n\
         This snippet was automatically extracted from the `{name}` theme.\n\
         \n\
         [View this file](./{file})\n",
        author = meta.author(),
        source = meta.repo_url(),
        license = meta.license(),
        title = title_case(stem),
        name = meta.name(),
        file = file_name,
    )
}

/// `dark-mode_toggle` → `Dark Mode Toggle`
fn title_case(stem: &str) -> String {
    stem.split(|c| c == '-' || c == '_' || c == ' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
