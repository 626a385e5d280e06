//! Local filesystem document store.
//!
//! Resolves stored document paths beneath a configured root directory.
//! Plain-text documents are read in full; other formats return a
//! not-extracted marker for the drafting step to substitute.

use async_trait::async_trait;
use log::*;
use std::path::{Component, Path, PathBuf};
use video_ai::error::Error;
use video_ai::traits::document;
use video_ai::types::document::Content;

/// Extensions read as plain text
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Joins a stored path onto the root, rejecting traversal outside it.
    fn resolve_path(&self, path: &str) -> Result<PathBuf, Error> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|component| matches!(component, Component::ParentDir | Component::RootDir))
        {
            return Err(Error::Configuration(format!(
                "Document path may not leave the store root: {path}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl document::Provider for LocalFileStore {
    async fn resolve(&self, path: &str) -> Result<Content, Error> {
        let extension = Path::new(path)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_lowercase())
            .unwrap_or_default();

        if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
            debug!("Document {path} not extracted (format: {extension})");
            return Ok(Content::NotExtracted { format: extension });
        }

        let full_path = self.resolve_path(path)?;
        match tokio::fs::read_to_string(&full_path).await {
            Ok(text) => Ok(Content::PlainText(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("No document stored at {path}")))
            }
            Err(e) => {
                warn!("Failed to read document {path}: {e}");
                Err(Error::Other(Box::new(e)))
            }
        }
    }
}
