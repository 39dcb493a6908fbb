use std::collections::HashMap;

/// Separator between the domain namespace and the message key in remote
/// key names. Domains and keys must not contain this sequence themselves,
/// otherwise `remote_key` and `local_key` stop being inverses.
pub const KEY_SEPARATOR: &str = "::";

/// Build the remote key name for a message: `"<domain>::<key>"`.
///
/// The Phrase project holds keys from every domain in a single flat
/// namespace, so keys are prefixed with their domain on the way out.
pub fn remote_key(domain: &str, key: &str) -> String {
    format!("{}{}{}", domain, KEY_SEPARATOR, key)
}

/// Strip the `"<domain>::"` prefix from a remote key name.
///
/// Returns `None` when the name does not belong to the given domain's
/// namespace, e.g. a key created outside this adapter.
pub fn local_key<'a>(domain: &str, name: &'a str) -> Option<&'a str> {
    name.strip_prefix(domain)?.strip_prefix(KEY_SEPARATOR)
}

/// A single translated message, addressed by (locale, domain, key).
///
/// Messages are immutable values: all fields are set at construction and
/// only readable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    key: String,
    domain: String,
    locale: String,
    translation: String,
    metadata: HashMap<String, String>,
}

impl Message {
    pub fn new(
        key: impl Into<String>,
        domain: impl Into<String>,
        locale: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            domain: domain.into(),
            locale: locale.into(),
            translation: translation.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach free-form metadata to the message.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}
