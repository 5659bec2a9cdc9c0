// crates/extract_snippets/src/config.rs

use std::path::PathBuf;

use load_snippet_config::{settings, ConfigError, LoadedConfig, DEFAULT_CONFIG_FILE};
use resolve_snippet_source::{anchor, parse_flag};

/// Runtime configuration composed from the command line and the run-wide
/// keys of the configuration file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub verbose: bool,
    /// Exit non-zero when any source failed.
    pub strict: bool,
    /// Where to write the snippet index, if anywhere.
    pub index_path: Option<PathBuf>,
}

impl AppConfig {
    /// Configuration file looked up in the working directory.
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Combines CLI flags with `INDEX_PATH` and `STRICT_EXIT` from the file.
    /// `--strict` wins over `STRICT_EXIT=false`.
    pub fn compose(verbose: bool, strict: bool, loaded: &LoadedConfig) -> Result<Self, ConfigError> {
        let file_strict = match loaded.settings.get(settings::STRICT_EXIT) {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| ConfigError::ConfigMalformed {
                path: loaded.origin.clone(),
                reason: format!("{} must be true or false, got '{}'", settings::STRICT_EXIT, raw),
            })?,
        };

        let index_path = loaded
            .settings
            .get(settings::INDEX_PATH)
            .filter(|p| !p.is_empty())
            .map(|p| anchor(&loaded.base_dir, p));

        Ok(Self {
            config_path: loaded.origin.clone(),
            verbose,
            strict: strict || file_strict,
            index_path,
        })
    }
}
