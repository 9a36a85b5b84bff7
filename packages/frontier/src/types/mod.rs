//! Core value types: links, fields, configuration.

pub mod config;
pub mod field;
pub mod link;

pub use config::{VisitPolicy, WalkConfig};
pub use field::{field_set, Field, FieldRecord, FieldSet, FieldValue};
pub use link::{Link, LinkKind};
