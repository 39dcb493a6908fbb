//! HTTP client for the Phrase Strings API v2.
//!
//! Covers exactly the endpoints the storage adapter drives: translation
//! index/create/update, key create/search/delete, locale download and file
//! upload. Every request carries the project's access token; non-success
//! statuses are turned into [`StorageError::Api`] with the response body
//! captured for the message.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StorageError;

const DEFAULT_API_URL: &str = "https://api.phrase.com/v2";

/// A translation row from the per-locale index.
#[derive(Debug, Clone, Deserialize)]
pub struct Translation {
    pub id: String,
    pub content: String,
    pub key: KeyRef,
}

/// The key a translation belongs to, as embedded in index responses.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRef {
    pub id: String,
    pub name: String,
}

/// A translation key, as returned by key create/search.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteKey {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
struct CreateKeyRequest<'a> {
    name: &'a str,
    tags: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateTranslationRequest<'a> {
    locale_id: &'a str,
    key_id: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateTranslationRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchKeysRequest<'a> {
    q: &'a str,
}

/// Client for the Phrase REST API.
#[derive(Debug, Clone)]
pub struct PhraseClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl PhraseClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DEFAULT_API_URL)
    }

    /// Point the client at a different API host, e.g. a mock server in
    /// tests.
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// List translations of a locale, filtered to keys carrying `tag`.
    pub async fn translations_by_locale(
        &self,
        project: &str,
        locale_id: &str,
        tag: &str,
    ) -> Result<Vec<Translation>, StorageError> {
        let url = format!(
            "{}/projects/{}/locales/{}/translations",
            self.base_url, project, locale_id
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .query(&[("q", format!("tags:{}", tag))])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let translations: Vec<Translation> = response.json().await?;

        debug!(
            "Indexed {} translations for locale {} tagged {}",
            translations.len(),
            locale_id,
            tag
        );
        Ok(translations)
    }

    /// Create a key named `name`, tagged with `tag`.
    pub async fn create_key(
        &self,
        project: &str,
        name: &str,
        tag: &str,
    ) -> Result<RemoteKey, StorageError> {
        let url = format!("{}/projects/{}/keys", self.base_url, project);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&CreateKeyRequest { name, tags: tag })
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Create a translation for an existing key under a locale.
    pub async fn create_translation(
        &self,
        project: &str,
        locale_id: &str,
        key_id: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/projects/{}/translations", self.base_url, project);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&CreateTranslationRequest {
                locale_id,
                key_id,
                content,
            })
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// Replace the content of an existing translation.
    pub async fn update_translation(
        &self,
        project: &str,
        translation_id: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let url = format!(
            "{}/projects/{}/translations/{}",
            self.base_url, project, translation_id
        );

        let response = self
            .client
            .patch(&url)
            .header("Authorization", self.auth_header())
            .json(&UpdateTranslationRequest { content })
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// Search keys by tag and name.
    pub async fn search_keys(
        &self,
        project: &str,
        tag: &str,
        name: &str,
    ) -> Result<Vec<RemoteKey>, StorageError> {
        let url = format!("{}/projects/{}/keys/search", self.base_url, project);
        let query = format!("tags:{} name:{}", tag, name);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&SearchKeysRequest { q: &query })
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Delete a key (and with it, its translations).
    pub async fn delete_key(&self, project: &str, key_id: &str) -> Result<(), StorageError> {
        let url = format!("{}/projects/{}/keys/{}", self.base_url, project, key_id);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// Download a locale's translations as a file in `file_format`,
    /// filtered to keys carrying `tag`.
    pub async fn download_locale(
        &self,
        project: &str,
        locale_id: &str,
        file_format: &str,
        tag: &str,
    ) -> Result<String, StorageError> {
        let url = format!(
            "{}/projects/{}/locales/{}/download",
            self.base_url, project, locale_id
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .query(&[("file_format", file_format), ("tags", tag)])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Upload a translation file, tagging its keys with `tag`.
    pub async fn upload(
        &self,
        project: &str,
        file_format: &str,
        path: &Path,
        locale_id: &str,
        tag: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/projects/{}/uploads", self.base_url, project);

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.xlf".to_string());
        let data = tokio::fs::read(path).await?;

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data).file_name(file_name),
            )
            .text("file_format", file_format.to_string())
            .text("locale_id", locale_id.to_string())
            .text("tags", tag.to_string());

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .multipart(form)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.access_token)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(StorageError::Api { status, body });
        }
        Ok(response)
    }
}
