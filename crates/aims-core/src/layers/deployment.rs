//! Deployment layer: commercial and operational context

use serde::{Deserialize, Serialize};

use super::{Validate, require, require_optional, validate_all};
use crate::error::ValidationError;

/// Declared brand affiliation that may influence outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandAffiliation {
    /// Brand name
    pub brand: String,
    /// Type of relationship (owner, partner, sponsor)
    pub relationship: String,
    /// How the affiliation affects outputs (boost, exclusive, ...)
    pub influence_type: Option<String>,
}

impl BrandAffiliation {
    pub fn new(brand: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            relationship: relationship.into(),
            influence_type: None,
        }
    }

    pub fn with_influence_type(mut self, influence: impl Into<String>) -> Self {
        self.influence_type = Some(influence.into());
        self
    }
}

impl Validate for BrandAffiliation {
    fn validate(&self) -> Result<(), ValidationError> {
        require("brand", &self.brand)?;
        require("relationship", &self.relationship)?;
        require_optional("influence_type", self.influence_type.as_deref())
    }
}

/// Commercial and operational factors that affect system behavior
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentLayer {
    /// Organization operating this AI system
    pub operator: Option<String>,
    pub brand_affiliations: Vec<BrandAffiliation>,
    pub domain_specialization: Vec<String>,
    /// Known biases or limitations disclosed by the operator
    pub declared_biases: Vec<String>,
    pub commercial_purpose: Option<String>,
}

impl DeploymentLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn with_brand_affiliation(mut self, affiliation: BrandAffiliation) -> Self {
        self.brand_affiliations.push(affiliation);
        self
    }

    pub fn with_domain_specialization<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_specialization = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_declared_bias(mut self, bias: impl Into<String>) -> Self {
        self.declared_biases.push(bias.into());
        self
    }

    pub fn with_commercial_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.commercial_purpose = Some(purpose.into());
        self
    }
}

impl Validate for DeploymentLayer {
    fn validate(&self) -> Result<(), ValidationError> {
        require_optional("operator", self.operator.as_deref())?;
        validate_all(&self.brand_affiliations)?;
        for domain in &self.domain_specialization {
            require("domain_specialization", domain)?;
        }
        for bias in &self.declared_biases {
            require("declared_biases", bias)?;
        }
        require_optional("commercial_purpose", self.commercial_purpose.as_deref())
    }
}
