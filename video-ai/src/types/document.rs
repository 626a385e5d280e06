//! Types for document store operations.

/// Resolved content of a stored reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Full plain-text content of the document
    PlainText(String),
    /// Document exists but its format is not extracted to text
    NotExtracted {
        /// Lowercased file extension, e.g. "pdf"
        format: String,
    },
}
