//! The three manifest layers
//!
//! - [`FoundationLayer`]: training data licensing provenance
//! - [`DeploymentLayer`]: commercial and operational context
//! - [`ContentAccessLayer`]: runtime content access rights
//!
//! Layers are plain records. Their only behavior is validation: required
//! strings must be present and enumerations must name a known variant.

pub mod content_access;
pub mod deployment;
pub mod foundation;

pub use content_access::{ContentAccessLayer, LicensedSource, RedistributionPolicy};
pub use deployment::{BrandAffiliation, DeploymentLayer};
pub use foundation::{DatasetReference, FoundationLayer};

use serde::de::DeserializeOwned;

use crate::error::ValidationError;

/// Constructor-time validation for layer records
pub trait Validate {
    /// Check field and enumeration constraints
    fn validate(&self) -> Result<(), ValidationError>;

    /// Decode a record from a JSON value and validate it
    ///
    /// Type mismatches and unknown enumeration strings are reported as
    /// [`ValidationError`], never as a panic or a silently defaulted field.
    fn from_json(value: serde_json::Value) -> Result<Self, ValidationError>
    where
        Self: Sized + DeserializeOwned,
    {
        let record: Self = serde_json::from_value(value).map_err(malformed)?;
        record.validate()?;
        Ok(record)
    }
}

/// Validate every element of a detail list
pub(crate) fn validate_all<T: Validate>(items: &[T]) -> Result<(), ValidationError> {
    items.iter().try_for_each(T::validate)
}

pub(crate) fn malformed(e: serde_json::Error) -> ValidationError {
    ValidationError::Malformed(e.to_string())
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_optional(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ValidationError::InvalidField {
            field,
            reason: "empty string; omit the field instead".to_string(),
        }),
        _ => Ok(()),
    }
}
