//! Field validation for schema-declared collections

pub mod validators;

pub use validators::{not_empty, not_null, of_type};
