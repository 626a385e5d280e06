//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries: `domain` is dependent on `entity_api`, and a boundary layer is
/// dependent on `domain`, but the boundary layer should not depend on `entity_api`
/// directly. The various `error_kind`s ultimately let a boundary layer decide what to
/// surface to the client: a missing record, a rejected request, or a fatal generation
/// failure.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    /// Request input rejected before the pipeline performed any work
    Validation(String),
    Other(String),
}

/// Enum representing the kinds of entity errors that can bubble up from the "Entity" layer
/// (`entity_api` and `entity`). These errors are translated from the `entity_api` layer to
/// the `domain` layer and reduced to a subset of error kinds that are relevant here.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    Store,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    /// The LLM text service failed to produce a usable narration script.
    /// Fatal to a pipeline run; no fallback script is synthesized.
    ScriptGeneration(String),
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm => EntityErrorKind::Invalid,
            EntityApiErrorKind::ValidationError => EntityErrorKind::Invalid,
            EntityApiErrorKind::SystemError => EntityErrorKind::Store,
            _ => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl Error {
    /// True when the error represents a missing referenced record.
    pub fn is_not_found(&self) -> bool {
        self.error_kind
            == DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
    }
}
