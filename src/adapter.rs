//! The Phrase storage adapter.
//!
//! Maps the generic [`Storage`]/[`TransferableStorage`] contract onto the
//! Phrase API: domains become key tags, local keys become namespaced remote
//! key names, and bulk transfer moves whole domains as XLIFF documents.

use std::collections::BTreeMap;
use std::io::Write;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::catalogue::MessageCatalogue;
use crate::client::PhraseClient;
use crate::config::PhraseConfig;
use crate::error::StorageError;
use crate::message::{local_key, remote_key, Message};
use crate::storage::{Storage, TransferableStorage};
use crate::xliff::{self, XliffOptions};

/// File format identifier for downloads and uploads.
const FILE_FORMAT: &str = "symfony_xliff";

/// Translation storage backed by a Phrase project.
///
/// Stateless between calls: every operation is a fresh request/response
/// cycle against the API.
#[derive(Debug, Clone)]
pub struct PhraseStorage {
    client: PhraseClient,
    config: PhraseConfig,
}

impl PhraseStorage {
    pub fn new(client: PhraseClient, config: PhraseConfig) -> Self {
        Self { client, config }
    }

    /// Resolve a locale code to its Phrase locale id.
    fn locale_id(&self, locale: &str) -> Result<&str, StorageError> {
        self.config
            .locale_ids
            .get(locale)
            .map(|id| id.as_str())
            .ok_or_else(|| StorageError::UnknownLocale {
                locale: locale.to_string(),
            })
    }

    fn xliff_options(&self) -> XliffOptions {
        XliffOptions {
            default_locale: self.config.default_locale.clone(),
        }
    }
}

#[async_trait]
impl Storage for PhraseStorage {
    async fn get(
        &self,
        locale: &str,
        domain: &str,
        key: &str,
    ) -> Result<Option<Message>, StorageError> {
        let locale_id = self.locale_id(locale)?;
        let name = remote_key(domain, key);

        let translations = self
            .client
            .translations_by_locale(&self.config.project_id, locale_id, domain)
            .await?;

        let found = translations
            .into_iter()
            .find(|translation| translation.key.name == name)
            .map(|translation| Message::new(key, domain, locale, translation.content));

        Ok(found)
    }

    /// Create the remote key, then its translation.
    ///
    /// Two remote calls with no atomicity guarantee: if the second call
    /// fails, the key exists without a translation.
    async fn create(&self, message: &Message) -> Result<(), StorageError> {
        let locale_id = self.locale_id(message.locale())?;
        let name = remote_key(message.domain(), message.key());

        let key = self
            .client
            .create_key(&self.config.project_id, &name, message.domain())
            .await?;

        self.client
            .create_translation(
                &self.config.project_id,
                locale_id,
                &key.id,
                message.translation(),
            )
            .await?;

        info!("Created translation {} for locale {}", name, message.locale());
        Ok(())
    }

    async fn update(&self, message: &Message) -> Result<(), StorageError> {
        let locale_id = self.locale_id(message.locale())?;
        let name = remote_key(message.domain(), message.key());

        let translations = self
            .client
            .translations_by_locale(&self.config.project_id, locale_id, message.domain())
            .await?;

        match translations
            .iter()
            .find(|translation| translation.key.name == name)
        {
            Some(translation) => {
                self.client
                    .update_translation(
                        &self.config.project_id,
                        &translation.id,
                        message.translation(),
                    )
                    .await?;
            }
            None => {
                warn!(
                    "No remote translation named {} for locale {}, nothing to update",
                    name,
                    message.locale()
                );
            }
        }

        Ok(())
    }

    async fn delete(&self, locale: &str, domain: &str, key: &str) -> Result<(), StorageError> {
        // delete operates on keys, not translations; the locale still has
        // to be configured for the operation to be meaningful
        self.locale_id(locale)?;
        let name = remote_key(domain, key);

        let keys = self
            .client
            .search_keys(&self.config.project_id, domain, &name)
            .await?;

        // the search matches loosely; only an exact name match is deleted
        match keys.iter().find(|remote| remote.name == name) {
            Some(remote) => {
                self.client
                    .delete_key(&self.config.project_id, &remote.id)
                    .await?;
            }
            None => {
                warn!("No remote key named {}, nothing to delete", name);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TransferableStorage for PhraseStorage {
    /// Download every configured domain and merge it into `catalogue`.
    ///
    /// A failed download aborts the export. A domain whose downloaded
    /// content does not parse contributes nothing, and the remaining
    /// domains are still merged.
    async fn export(&self, catalogue: &mut MessageCatalogue) -> Result<(), StorageError> {
        let locale = catalogue.locale().to_string();
        let locale_id = self.locale_id(&locale)?;

        for domain in &self.config.domains {
            let content = self
                .client
                .download_locale(&self.config.project_id, locale_id, FILE_FORMAT, domain)
                .await?;

            let remote = match xliff::content_to_catalogue(&content, &locale, domain) {
                Ok(remote) => remote,
                Err(error) => {
                    warn!(
                        "Skipping domain {} for locale {}: {}",
                        domain, locale, error
                    );
                    continue;
                }
            };

            let mut messages = BTreeMap::new();
            if let Some(entries) = remote.domain(domain) {
                for (name, translation) in entries {
                    match local_key(domain, name) {
                        Some(key) => {
                            messages.insert(key.to_string(), translation.clone());
                        }
                        None => {
                            warn!(
                                "Skipping remote key {} outside the {} namespace",
                                name, domain
                            );
                        }
                    }
                }
            }

            info!(
                "Exported {} messages for domain {} locale {}",
                messages.len(),
                domain,
                locale
            );

            let mut stripped = MessageCatalogue::new(&locale);
            stripped.replace(domain, messages);
            catalogue.merge(stripped);
        }

        Ok(())
    }

    /// Serialize every configured domain to XLIFF and upload it.
    ///
    /// Each domain's document is staged in a uniquely named temporary file
    /// that is removed when the upload finishes, whether it succeeded or
    /// not. The caller's catalogue is not modified.
    async fn import(&self, catalogue: &MessageCatalogue) -> Result<(), StorageError> {
        let locale = catalogue.locale().to_string();
        let locale_id = self.locale_id(&locale)?;
        let options = self.xliff_options();

        let staging_dir = self
            .config
            .staging_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);

        for domain in &self.config.domains {
            // rewrite keys to the remote naming convention on a staged
            // copy; the caller's catalogue keeps its local keys
            let mut staged = MessageCatalogue::new(&locale);
            if let Some(entries) = catalogue.domain(domain) {
                for (key, translation) in entries {
                    staged.set(domain, &remote_key(domain, key), translation);
                }
            }

            let content = xliff::catalogue_to_content(&staged, domain, &options)?;

            // the file deletes itself on drop, on every exit path
            let mut file = tempfile::Builder::new()
                .prefix(&format!("{}.{}.", domain, locale))
                .suffix(".xlf")
                .tempfile_in(&staging_dir)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;

            self.client
                .upload(
                    &self.config.project_id,
                    FILE_FORMAT,
                    file.path(),
                    locale_id,
                    domain,
                )
                .await?;

            info!(
                "Imported {} messages for domain {} locale {}",
                staged.len(),
                domain,
                locale
            );
        }

        Ok(())
    }
}
