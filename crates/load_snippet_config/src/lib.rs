// crates/load_snippet_config/src/lib.rs

//! Reads the key/value configuration file that describes which theme files to
//! extract snippets from.
//!
//! Two layouts are understood. A single source uses flat keys:
//!
//! ```text
//! SOURCE_PATH=themes/minimal/theme.css
//! OUTPUT_PATH=snippets/minimal/theme.css
//! ```
//!
//! Several sources use numbered keys, `SOURCE_<n>_<FIELD>`:
//!
//! ```text
//! SOURCE_1_PATH=themes/minimal/theme.css
//! SOURCE_2_PATH=themes/things/theme.css
//! SOURCE_2_OUTPUT_PATH=snippets/things.css
//! ```
//!
//! Keys are grouped per source but not interpreted here; turning a group into
//! a source entry is the resolver's job.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// File name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".env";

/// Canonical field names used inside a [`RawConfig`] group.
pub mod fields {
    pub const PATH: &str = "PATH";
    pub const OUTPUT_PATH: &str = "OUTPUT_PATH";
    pub const START_MARKER: &str = "START_MARKER";
    pub const END_MARKER: &str = "END_MARKER";
    pub const NAME: &str = "NAME";
    pub const AUTHOR: &str = "AUTHOR";
    pub const LICENSE: &str = "LICENSE";
    pub const REPO_URL: &str = "REPO_URL";
    pub const OVERWRITE: &str = "OVERWRITE";

    pub const ALL: &[&str] = &[
        PATH,
        OUTPUT_PATH,
        START_MARKER,
        END_MARKER,
        NAME,
        AUTHOR,
        LICENSE,
        REPO_URL,
        OVERWRITE,
    ];
}

/// Run-wide keys, not tied to any source.
pub mod settings {
    pub const INDEX_PATH: &str = "INDEX_PATH";
    pub const STRICT_EXIT: &str = "STRICT_EXIT";

    pub const ALL: &[&str] = &[INDEX_PATH, STRICT_EXIT];
}

/// Flat key → canonical field.
const FLAT_KEYS: &[(&str, &str)] = &[
    ("SOURCE_PATH", fields::PATH),
    ("OUTPUT_PATH", fields::OUTPUT_PATH),
    ("START_MARKER", fields::START_MARKER),
    ("END_MARKER", fields::END_MARKER),
    ("SOURCE_NAME", fields::NAME),
    ("AUTHOR", fields::AUTHOR),
    ("LICENSE", fields::LICENSE),
    ("REPO_URL", fields::REPO_URL),
    ("OVERWRITE", fields::OVERWRITE),
];

/// Flat fields that describe a theme rather than place a source. In the
/// numbered layout they are shared by every source that does not set its own.
const SHARED_FIELDS: &[&str] = &[fields::NAME, fields::AUTHOR, fields::LICENSE, fields::REPO_URL];

/// Identifier given to the single group of the flat layout.
pub const FLAT_IDENTIFIER: &str = "source";

static NUMBERED_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SOURCE_(\d+)_([A-Z_]+)$").expect("valid numbered key regex"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("cannot read configuration file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration in {}: {reason}", path.display())]
    ConfigMalformed { path: PathBuf, reason: String },
}

/// Ordered key/value pairs, kept verbatim as strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawConfig {
    identifier: String,
    entries: Vec<(String, String)>,
}

impl RawConfig {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            entries: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key`. A repeated key takes the new value but keeps its first position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything read from one configuration file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Where the configuration came from.
    pub origin: PathBuf,
    /// Directory relative paths are resolved against.
    pub base_dir: PathBuf,
    /// One group per source, in ascending suffix order.
    pub groups: Vec<RawConfig>,
    /// Run-wide settings.
    pub settings: RawConfig,
}

/// Loads and groups the configuration file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LoadedConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::ConfigMissing {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    parse_config(&content, path, base_dir)
}

/// Groups already-read configuration text. `origin` only labels errors.
pub fn parse_config(
    content: &str,
    origin: &Path,
    base_dir: PathBuf,
) -> Result<LoadedConfig, ConfigError> {
    let malformed = |reason: String| ConfigError::ConfigMalformed {
        path: origin.to_path_buf(),
        reason,
    };

    let mut flat = RawConfig::new(FLAT_IDENTIFIER);
    let mut numbered: BTreeMap<u32, RawConfig> = BTreeMap::new();
    let mut run_settings = RawConfig::new("settings");

    for (key, value) in parse_assignments(content) {
        if settings::ALL.contains(&key.as_str()) {
            run_settings.insert(key, value);
            continue;
        }
        if let Some(&(_, field)) = FLAT_KEYS.iter().find(|(flat_key, _)| *flat_key == key) {
            flat.insert(field, value);
            continue;
        }
        if let Some(caps) = NUMBERED_KEY.captures(&key) {
            let field = &caps[2];
            if !fields::ALL.contains(&field) {
                log::debug!("Ignoring unknown source field in key {}", key);
                continue;
            }
            let suffix: u32 = match caps[1].parse() {
                Ok(n) => n,
                Err(_) => {
                    log::warn!("Ignoring key {} with out-of-range suffix", key);
                    continue;
                }
            };
            numbered
                .entry(suffix)
                .or_insert_with(|| RawConfig::new(format!("source_{}", suffix)))
                .insert(field, value);
            continue;
        }
        log::debug!("Ignoring unrelated key {}", key);
    }

    let mut shared = RawConfig::new("shared");
    for (key, value) in flat.iter().filter(|(k, _)| SHARED_FIELDS.contains(k)) {
        shared.insert(key, value);
    }

    let groups: Vec<RawConfig> = if numbered.is_empty() {
        if flat.is_empty() {
            Vec::new()
        } else {
            vec![flat]
        }
    } else {
        let placed: Vec<&str> = flat
            .iter()
            .map(|(k, _)| k)
            .filter(|k| !SHARED_FIELDS.contains(k))
            .map(|k| {
                FLAT_KEYS
                    .iter()
                    .find(|(_, field)| *field == k)
                    .map_or(k, |(flat_key, _)| *flat_key)
            })
            .collect();
        if !placed.is_empty() {
            return Err(malformed(format!(
                "flat source keys ({}) cannot be mixed with numbered SOURCE_<n>_* keys",
                placed.join(", ")
            )));
        }
        numbered.into_values().collect()
    };

    if groups.is_empty() {
        return Err(malformed("no source is defined".to_string()));
    }

    for group in &groups {
        validate_group(group).map_err(&malformed)?;
    }

    // In the numbered layout, bare metadata keys are defaults for every source.
    let groups: Vec<RawConfig> = groups
        .into_iter()
        .map(|mut group| {
            if group.identifier() != FLAT_IDENTIFIER {
                for (key, value) in shared.iter() {
                    if !group.contains(key) {
                        group.insert(key, value);
                    }
                }
            }
            group
        })
        .collect();

    Ok(LoadedConfig {
        origin: origin.to_path_buf(),
        base_dir,
        groups,
        settings: run_settings,
    })
}

/// Checks that a group has its required key and complete marker pair.
fn validate_group(group: &RawConfig) -> Result<(), String> {
    if !group.contains(fields::PATH) {
        let declared: Vec<&str> = group.iter().map(|(k, _)| k).collect();
        return Err(format!(
            "source '{}' declares {} but no {}",
            group.identifier(),
            declared.join(", "),
            fields::PATH
        ));
    }
    match (group.contains(fields::START_MARKER), group.contains(fields::END_MARKER)) {
        (true, false) => Err(format!(
            "source '{}' declares {} without {}",
            group.identifier(),
            fields::START_MARKER,
            fields::END_MARKER
        )),
        (false, true) => Err(format!(
            "source '{}' declares {} without {}",
            group.identifier(),
            fields::END_MARKER,
            fields::START_MARKER
        )),
        _ => Ok(()),
    }
}

/// Splits the file into `(key, value)` pairs in declaration order.
///
/// Blank lines and `#` comments are skipped. Values lose surrounding spaces and
/// quote characters. A repeated key keeps its first position and its last value.
pub fn parse_assignments(content: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            log::warn!("Ignoring line {} without '=': {}", idx + 1, line);
            continue;
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            log::warn!("Ignoring line {} with an empty key", idx + 1);
            continue;
        }
        let value = value
            .trim()
            .trim_matches(|c| c == '\'' || c == '"' || c == ' ')
            .to_string();
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => pairs.push((key, value)),
        }
    }
    pairs
}
