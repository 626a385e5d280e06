//! Document store provider trait.

use crate::types::document::Content;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for stores holding uploaded reference documents.
///
/// Resolves a stored path to raw text content for plain-text documents and
/// returns a not-extracted marker for other formats. Full binary-format
/// extraction (PDF, DOCX) is a deliberate scope limit of the workflow, not
/// of this trait; richer stores can extract more formats behind it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Resolve a stored document path to its readable content.
    ///
    /// Returns `Error::NotFound` when no document exists at `path`.
    async fn resolve(&self, path: &str) -> Result<Content, Error>;
}
