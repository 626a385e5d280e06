//! Business logic for the HCP engagement video pipeline.
//!
//! This module re-exports various items from the `entity_api` crate so that
//! consumers of the `domain` crate do not need to directly depend on it. The
//! re-exports provide a consistent interface for working with records and the
//! backing store, while the underlying implementation details remain in the
//! `entity_api` crate.
pub use entity_api::{
    compliance_details, compliance_status, meditag_segment, memory::InMemoryStore,
    stats::ComplianceStats, store::NewUpload, store::NewVideo, store::Store, uploads, videos, Id,
};

pub mod compliance;
pub mod error;
pub mod pipeline;
pub mod script;
pub mod segmenter;
pub mod stats;
pub mod synthesis;
pub mod upload;
pub mod video;

pub mod gateway;
