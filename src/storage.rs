//! The generic "translation storage" contract.
//!
//! Callers program against these traits; [`PhraseStorage`] is the Phrase
//! implementation. Single-message operations address one (locale, domain,
//! key); bulk operations move whole catalogues.
//!
//! [`PhraseStorage`]: crate::adapter::PhraseStorage

use async_trait::async_trait;

use crate::catalogue::MessageCatalogue;
use crate::error::StorageError;
use crate::message::Message;

/// CRUD on individual translation messages.
#[async_trait]
pub trait Storage {
    /// Fetch a single message. `Ok(None)` when no matching entry exists.
    async fn get(
        &self,
        locale: &str,
        domain: &str,
        key: &str,
    ) -> Result<Option<Message>, StorageError>;

    /// Create a new message in remote storage.
    async fn create(&self, message: &Message) -> Result<(), StorageError>;

    /// Update an existing message. A message that does not exist remotely
    /// is left alone; this is not an error.
    async fn update(&self, message: &Message) -> Result<(), StorageError>;

    /// Delete a message. Deleting a message that does not exist is a no-op.
    async fn delete(&self, locale: &str, domain: &str, key: &str) -> Result<(), StorageError>;
}

/// Bulk transfer of whole catalogues.
#[async_trait]
pub trait TransferableStorage {
    /// Download remote content for the catalogue's locale and merge it into
    /// `catalogue`.
    async fn export(&self, catalogue: &mut MessageCatalogue) -> Result<(), StorageError>;

    /// Upload the catalogue's content to remote storage.
    async fn import(&self, catalogue: &MessageCatalogue) -> Result<(), StorageError>;
}
