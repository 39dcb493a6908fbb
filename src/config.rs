use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid {variable} entry \"{entry}\", expected \"{expected}\"")]
    Invalid {
        variable: &'static str,
        entry: String,
        expected: &'static str,
    },
}

/// Immutable configuration for a [`PhraseStorage`] adapter.
///
/// All knobs are fixed at construction; the adapter holds no other state
/// between calls.
///
/// [`PhraseStorage`]: crate::adapter::PhraseStorage
#[derive(Debug, Clone)]
pub struct PhraseConfig {
    /// Phrase project the adapter operates on.
    pub project_id: String,

    /// Locale code → Phrase locale id. Every locale the adapter is asked
    /// to operate on must have an entry here.
    pub locale_ids: HashMap<String, String>,

    /// Domains handled during bulk export/import. Other domains present in
    /// a catalogue are ignored.
    pub domains: Vec<String>,

    /// Source locale declared in exported XLIFF documents.
    pub default_locale: Option<String>,

    /// Where `import` stages XLIFF files before upload.
    /// Defaults to the system temp directory.
    pub staging_dir: Option<PathBuf>,
}

impl PhraseConfig {
    pub fn new(
        project_id: impl Into<String>,
        locale_ids: HashMap<String, String>,
        domains: Vec<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            locale_ids,
            domains,
            default_locale: None,
            staging_dir: None,
        }
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Build a configuration from the process environment.
    ///
    /// - `PHRASE_PROJECT_ID` (required)
    /// - `PHRASE_LOCALES` (required): comma list of `code:id` pairs,
    ///   e.g. `de:c5f...,fr:0ab...`
    /// - `PHRASE_DOMAINS` (required): comma list of domain names
    /// - `PHRASE_DEFAULT_LOCALE` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id = std::env::var("PHRASE_PROJECT_ID")
            .map_err(|_| ConfigError::Missing("PHRASE_PROJECT_ID"))?;

        let mut locale_ids = HashMap::new();
        let locales =
            std::env::var("PHRASE_LOCALES").map_err(|_| ConfigError::Missing("PHRASE_LOCALES"))?;
        for entry in locales.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, id) = entry.split_once(':').ok_or_else(|| ConfigError::Invalid {
                variable: "PHRASE_LOCALES",
                entry: entry.to_string(),
                expected: "code:id",
            })?;
            locale_ids.insert(code.trim().to_string(), id.trim().to_string());
        }

        let domains = std::env::var("PHRASE_DOMAINS")
            .map_err(|_| ConfigError::Missing("PHRASE_DOMAINS"))?
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();

        let mut config = Self::new(project_id, locale_ids, domains);
        if let Ok(locale) = std::env::var("PHRASE_DEFAULT_LOCALE") {
            config = config.with_default_locale(locale);
        }

        Ok(config)
    }
}
