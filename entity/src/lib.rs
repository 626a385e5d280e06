use uuid::Uuid;

// Core entities
pub mod uploads;
pub mod videos;

// Classification and compliance value types
pub mod compliance_details;
pub mod compliance_status;
pub mod meditag_segment;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
