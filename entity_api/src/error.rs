//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex a record looked up by id does not exist
///  * Errors related to interactions with the backing store itself.
#[derive(Debug)]
pub struct Error {
    // Underlying error emitted from the backing store, if any
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Invalid search term
    InvalidQueryTerm,
    // Record not found
    RecordNotFound,
    // Record not updated
    RecordNotUpdated,
    // Input rejected before reaching the store
    ValidationError,
    // Errors related to interactions with the store itself
    SystemError,
    // Other errors
    Other,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
