//! Content access layer: runtime content access rights
//!
//! Specifies what content a system may access during inference and what it
//! may pass on to other agents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Validate, malformed, require, require_optional, validate_all};
use crate::error::ValidationError;

/// Policy for redistributing accessed content to other agents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedistributionPolicy {
    /// Content may not be shared with other agents
    None,
    /// Summaries may be shared, verbatim content may not
    #[default]
    SummaryOnly,
    /// Content may be shared with attribution
    Attributed,
    /// No restrictions on sharing
    Unrestricted,
}

impl RedistributionPolicy {
    pub const ALL: [RedistributionPolicy; 4] = [
        RedistributionPolicy::None,
        RedistributionPolicy::SummaryOnly,
        RedistributionPolicy::Attributed,
        RedistributionPolicy::Unrestricted,
    ];

    /// Wire form of the policy
    pub fn as_str(&self) -> &'static str {
        match self {
            RedistributionPolicy::None => "none",
            RedistributionPolicy::SummaryOnly => "summary_only",
            RedistributionPolicy::Attributed => "attributed",
            RedistributionPolicy::Unrestricted => "unrestricted",
        }
    }
}

impl fmt::Display for RedistributionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedistributionPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "redistribution policy",
                value: s.to_string(),
            })
    }
}

/// A content source this system has licensed access to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensedSource {
    /// Source identifier
    pub identifier: String,
    /// Type of license (first-party, granted, marketplace)
    pub license_type: String,
    /// Scope of access (full, partial, specific-content)
    pub scope: Option<String>,
    /// ISO 8601 expiration date, if the license expires
    pub expires_at: Option<String>,
}

impl LicensedSource {
    pub fn new(identifier: impl Into<String>, license_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            license_type: license_type.into(),
            scope: None,
            expires_at: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_expires_at(mut self, expires_at: impl Into<String>) -> Self {
        self.expires_at = Some(expires_at.into());
        self
    }
}

impl Validate for LicensedSource {
    fn validate(&self) -> Result<(), ValidationError> {
        require("identifier", &self.identifier)?;
        require("license_type", &self.license_type)?;
        require_optional("scope", self.scope.as_deref())?;
        match self.expires_at.as_deref() {
            Some(ts) if !is_iso8601(ts) => Err(ValidationError::InvalidField {
                field: "expires_at",
                reason: format!("not an ISO 8601 date: {ts}"),
            }),
            _ => Ok(()),
        }
    }
}

fn is_iso8601(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Runtime content access rights
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentAccessLayer {
    /// Source identifiers this system can access
    pub licensed_sources: Vec<String>,
    pub source_details: Vec<LicensedSource>,
    /// Default policy for sharing content with other agents
    pub redistribution_policy: RedistributionPolicy,
    /// RSL license identifiers held by this system
    pub rsl_licenses: Vec<String>,
    pub content_partnerships: Vec<String>,
}

impl ContentAccessLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_licensed_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.licensed_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source_detail(mut self, source: LicensedSource) -> Self {
        self.source_details.push(source);
        self
    }

    pub fn with_redistribution_policy(mut self, policy: RedistributionPolicy) -> Self {
        self.redistribution_policy = policy;
        self
    }

    pub fn with_rsl_license(mut self, license: impl Into<String>) -> Self {
        self.rsl_licenses.push(license.into());
        self
    }

    pub fn with_content_partnership(mut self, partnership: impl Into<String>) -> Self {
        self.content_partnerships.push(partnership.into());
        self
    }
}

impl Validate for ContentAccessLayer {
    fn validate(&self) -> Result<(), ValidationError> {
        for source in &self.licensed_sources {
            require("licensed_sources", source)?;
        }
        validate_all(&self.source_details)?;
        for license in &self.rsl_licenses {
            require("rsl_licenses", license)?;
        }
        for partnership in &self.content_partnerships {
            require("content_partnerships", partnership)?;
        }
        Ok(())
    }

    fn from_json(value: serde_json::Value) -> Result<Self, ValidationError>
    where
        Self: Sized + DeserializeOwned,
    {
        // Name the offending policy instead of surfacing a generic decode failure
        if let Some(policy) = value.get("redistribution_policy").and_then(|v| v.as_str()) {
            policy.parse::<RedistributionPolicy>()?;
        }
        let layer: Self = serde_json::from_value(value).map_err(malformed)?;
        layer.validate()?;
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_default_is_summary_only() {
        assert_eq!(RedistributionPolicy::default(), RedistributionPolicy::SummaryOnly);
        assert_eq!(
            ContentAccessLayer::default().redistribution_policy,
            RedistributionPolicy::SummaryOnly
        );
    }

    #[test]
    fn test_policy_wire_strings() {
        for policy in RedistributionPolicy::ALL {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.as_str()));
            assert_eq!(policy.as_str().parse::<RedistributionPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_policy_rejects_unknown() {
        let err = "maybe".parse::<RedistributionPolicy>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownVariant { .. }));
        assert!("Attributed".parse::<RedistributionPolicy>().is_err());
    }

    #[test]
    fn test_layer_from_json_with_policy() {
        let layer = ContentAccessLayer::from_json(json!({
            "licensed_sources": ["source:wirecutter"],
            "redistribution_policy": "attributed",
        }))
        .unwrap();
        assert_eq!(layer.redistribution_policy, RedistributionPolicy::Attributed);
    }

    #[test]
    fn test_non_string_policy_is_malformed() {
        let err =
            ContentAccessLayer::from_json(json!({"redistribution_policy": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn test_licensed_source_expiry() {
        assert!(LicensedSource::new("source:a", "granted")
            .with_expires_at("2027-01-31")
            .validate()
            .is_ok());
        assert!(LicensedSource::new("source:a", "granted")
            .with_expires_at("2027-01-31T00:00:00Z")
            .validate()
            .is_ok());

        let err = LicensedSource::new("source:a", "granted")
            .with_expires_at("next year")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "expires_at", .. }));
    }

    #[test]
    fn test_licensed_source_requires_license_type() {
        let err = LicensedSource::from_json(json!({"identifier": "source:a"})).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }
}
