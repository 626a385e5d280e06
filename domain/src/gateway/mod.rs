//! HTTP clients for the external providers behind the pipeline.

pub mod d_id;
pub mod heygen;
pub mod local_files;
pub mod open_ai;
