//! Translation storage backed by the [Phrase](https://phrase.com) API.
//!
//! The crate adapts Phrase's translation-management REST API to a generic
//! "translation storage" contract: CRUD on individual messages addressed by
//! (locale, domain, key), plus bulk export/import of whole catalogues as
//! XLIFF 1.2 documents.
//!
//! Domains are mapped to Phrase key tags, and local keys are namespaced as
//! `"<domain>::<key>"` in the remote project.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use phrase_storage::{PhraseClient, PhraseConfig, PhraseStorage, Storage};
//!
//! # async fn run() -> Result<(), phrase_storage::StorageError> {
//! let config = PhraseConfig::new(
//!     "my-project-id",
//!     HashMap::from([("de".to_string(), "locale-id".to_string())]),
//!     vec!["messages".to_string()],
//! );
//! let storage = PhraseStorage::new(PhraseClient::new("access-token"), config);
//!
//! let message = storage.get("de", "messages", "greeting").await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod catalogue;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod storage;
pub mod xliff;

pub use adapter::PhraseStorage;
pub use catalogue::MessageCatalogue;
pub use client::PhraseClient;
pub use config::{ConfigError, PhraseConfig};
pub use error::StorageError;
pub use message::Message;
pub use storage::{Storage, TransferableStorage};
