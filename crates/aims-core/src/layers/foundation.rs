//! Foundation layer: training data licensing provenance

use serde::{Deserialize, Serialize};

use super::{Validate, require, require_optional, validate_all};
use crate::error::ValidationError;

/// Reference to a training dataset with licensing info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReference {
    /// Dataset identifier (e.g. `dataset:openwebtext`)
    pub identifier: String,
    /// SPDX license identifier or custom license URL
    pub license: Option<String>,
    /// Whether the dataset is RSL compliant
    #[serde(default)]
    pub rsl_compliant: bool,
    /// Merkle root committing to the dataset contents, for selective audit disclosure
    pub merkle_root: Option<String>,
}

impl DatasetReference {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            license: None,
            rsl_compliant: false,
            merkle_root: None,
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_rsl_compliant(mut self, compliant: bool) -> Self {
        self.rsl_compliant = compliant;
        self
    }

    pub fn with_merkle_root(mut self, root: impl Into<String>) -> Self {
        self.merkle_root = Some(root.into());
        self
    }
}

impl Validate for DatasetReference {
    fn validate(&self) -> Result<(), ValidationError> {
        require("identifier", &self.identifier)?;
        require_optional("license", self.license.as_deref())?;
        require_optional("merkle_root", self.merkle_root.as_deref())
    }
}

/// Training data licensing provenance
///
/// Documents what data trained the model and its licensing status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoundationLayer {
    /// Dataset identifiers used in training
    pub training_datasets: Vec<String>,
    /// Detailed dataset references with licensing info
    pub dataset_details: Vec<DatasetReference>,
    /// Whether the system claims RSL compliance for its training data
    pub rsl_compliance: bool,
    /// Human-readable summary of training data licensing
    pub licensing_summary: Option<String>,
    /// Contact for licensing audit requests
    pub audit_contact: Option<String>,
}

impl FoundationLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_training_datasets<I, S>(mut self, datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.training_datasets = datasets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dataset(mut self, dataset: DatasetReference) -> Self {
        self.dataset_details.push(dataset);
        self
    }

    pub fn with_rsl_compliance(mut self, compliant: bool) -> Self {
        self.rsl_compliance = compliant;
        self
    }

    pub fn with_licensing_summary(mut self, summary: impl Into<String>) -> Self {
        self.licensing_summary = Some(summary.into());
        self
    }

    pub fn with_audit_contact(mut self, contact: impl Into<String>) -> Self {
        self.audit_contact = Some(contact.into());
        self
    }
}

impl Validate for FoundationLayer {
    fn validate(&self) -> Result<(), ValidationError> {
        for dataset in &self.training_datasets {
            require("training_datasets", dataset)?;
        }
        validate_all(&self.dataset_details)?;
        require_optional("licensing_summary", self.licensing_summary.as_deref())?;
        require_optional("audit_contact", self.audit_contact.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let layer = FoundationLayer::new()
            .with_training_datasets(["dataset:openwebtext", "dataset:product-reviews"])
            .with_dataset(DatasetReference::new("dataset:openwebtext").with_license("CC-BY-4.0"))
            .with_rsl_compliance(true)
            .with_licensing_summary("Trained on licensed and public domain data");

        assert_eq!(layer.training_datasets.len(), 2);
        assert!(layer.rsl_compliance);
        assert!(layer.validate().is_ok());
    }

    #[test]
    fn test_dataset_reference_requires_identifier() {
        let err = DatasetReference::from_json(json!({"license": "MIT"})).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));

        let err = DatasetReference::new("  ").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("identifier"));
    }

    #[test]
    fn test_nested_dataset_validated() {
        let layer = FoundationLayer::new().with_dataset(DatasetReference::new(""));
        assert!(layer.validate().is_err());
    }

    #[test]
    fn test_empty_optional_rejected() {
        let layer = FoundationLayer::new().with_audit_contact("");
        assert!(matches!(
            layer.validate(),
            Err(ValidationError::InvalidField { field: "audit_contact", .. })
        ));
    }
}
