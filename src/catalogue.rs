use std::collections::BTreeMap;

/// An in-memory collection of translated strings for one locale,
/// organized by domain, then message key.
///
/// The catalogue is a plain container: it carries no knowledge of where
/// its entries came from or where they are going. Domains and keys are
/// kept in sorted order so that serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalogue {
    locale: String,
    domains: BTreeMap<String, BTreeMap<String, String>>,
}

impl MessageCatalogue {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            domains: BTreeMap::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Set a single translation, creating the domain if needed.
    /// An existing entry under the same (domain, key) is overwritten.
    pub fn set(&mut self, domain: &str, key: &str, translation: &str) {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .insert(key.to_string(), translation.to_string());
    }

    pub fn get(&self, domain: &str, key: &str) -> Option<&str> {
        self.domains
            .get(domain)?
            .get(key)
            .map(|translation| translation.as_str())
    }

    /// All messages of one domain, or `None` when the domain is absent.
    pub fn domain(&self, domain: &str) -> Option<&BTreeMap<String, String>> {
        self.domains.get(domain)
    }

    /// Replace a domain's messages wholesale.
    pub fn replace(&mut self, domain: &str, messages: BTreeMap<String, String>) {
        self.domains.insert(domain.to_string(), messages);
    }

    /// Merge another catalogue of the same locale into this one.
    /// Entries from `other` win over existing entries.
    pub fn merge(&mut self, other: MessageCatalogue) {
        debug_assert_eq!(self.locale, other.locale, "cannot merge catalogues of different locales");

        for (domain, messages) in other.domains {
            self.domains.entry(domain).or_default().extend(messages);
        }
    }

    /// Names of the domains that currently hold at least one entry.
    pub fn domains(&self) -> Vec<&str> {
        self.domains.keys().map(|domain| domain.as_str()).collect()
    }

    /// Total number of messages across all domains.
    pub fn len(&self) -> usize {
        self.domains.values().map(|messages| messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
