//! Declarative collection schemas
//!
//! A [`CollectionSchema`] names a collection, lists its fields with their
//! constraints and declares the default read ordering. The store checks every
//! incoming document against it before anything is persisted.
//!
//! ```rust,ignore
//! pub static SCHEMA: CollectionSchema = CollectionSchema {
//!     name: "syndication_in",
//!     fields: &[
//!         FieldSpec::id("blog_id").required(),
//!         FieldSpec::string("blog_token").required().unique(),
//!     ],
//!     default_sort: SortSpec::desc(UPDATED_AT),
//! };
//! ```

use crate::core::entity::{Document, META_FIELDS, UPDATED_AT};
use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::validation::{not_empty, not_null, of_type};
use serde::{Deserialize, Serialize};

/// Type of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Identifier of another record (UUID string)
    Id,
    /// Free-form string
    String,
}

/// Constraints declared for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub unique: bool,
    pub nullable: bool,
    pub allow_empty: bool,
    /// Field holds a bearer credential
    pub credential: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            unique: false,
            nullable: false,
            allow_empty: true,
            credential: false,
        }
    }

    /// An identifier field
    pub const fn id(name: &'static str) -> Self {
        Self::new(name, FieldType::Id)
    }

    /// A string field
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    pub const fn non_empty(self) -> Self {
        Self {
            allow_empty: false,
            ..self
        }
    }

    /// Mark the field as a bearer credential; conflicts on it are token conflicts
    pub const fn credential(self) -> Self {
        Self {
            credential: true,
            ..self
        }
    }

    /// Check a value present in a document against this field's constraints
    fn check(&self, value: &serde_json::Value) -> Result<(), String> {
        if value.is_null() {
            return if self.nullable {
                Ok(())
            } else {
                not_null()(self.name, value)
            };
        }
        of_type(self.field_type)(self.name, value)?;
        if !self.allow_empty {
            not_empty()(self.name, value)?;
        }
        Ok(())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort field and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// How a document is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Full document: required fields must be present (create and replace)
    Full,
    /// Partial update: only the supplied fields are checked
    Patch,
}

/// Schema declared for a collection
#[derive(Debug)]
pub struct CollectionSchema {
    /// Collection name, also the resource URL segment and notification key
    pub name: &'static str,

    /// Declared fields
    pub fields: &'static [FieldSpec],

    /// Ordering applied when reading without an explicit sort
    pub default_sort: SortSpec,
}

impl CollectionSchema {
    /// Look up a declared field
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields carrying a uniqueness constraint
    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.unique)
    }

    /// Resolve a sort expression (`field`, `field:asc`, `field:desc`)
    ///
    /// Only declared fields and the timestamp metadata are sortable.
    pub fn parse_sort(&self, expr: &str) -> Option<SortSpec> {
        let (field, direction) = match expr.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some(_) => return None,
            None => (expr, SortDirection::Asc),
        };

        let field = META_FIELDS
            .iter()
            .copied()
            .chain(self.fields.iter().map(|f| f.name))
            .find(|name| *name == field)?;

        Some(SortSpec { field, direction })
    }

    /// Validate a document against this schema
    ///
    /// All problems are collected; the error lists every offending field.
    pub fn validate(&self, doc: &Document, mode: ValidationMode) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        for key in doc.keys() {
            if self.field(key).is_none() {
                errors.push(FieldValidationError::new(key.as_str(), "unknown field"));
            }
        }

        for spec in self.fields {
            match doc.get(spec.name) {
                Some(value) => {
                    if let Err(message) = spec.check(value) {
                        errors.push(FieldValidationError::new(spec.name, message));
                    } else if spec.required && value.is_null() {
                        errors.push(FieldValidationError::new(spec.name, "required field"));
                    }
                }
                None if spec.required && mode == ValidationMode::Full => {
                    errors.push(FieldValidationError::new(spec.name, "required field"));
                }
                None => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(errors))
        }
    }
}

/// Most-recently-updated first
pub const DEFAULT_SORT: SortSpec = SortSpec::desc(UPDATED_AT);
