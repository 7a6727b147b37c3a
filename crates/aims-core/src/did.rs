//! Decentralized identifiers for AI systems
//!
//! AIMS DIDs follow the format `did:aims:<method>:<organization>:<system_id>`:
//!
//! - `method`: resolution method, lowercase ASCII letters (`web`, `key`, ...)
//! - `organization`: `[A-Za-z0-9.-]+`, a domain for the `web` method
//! - `system_id`: `[A-Za-z0-9_-]+`, unique within the organization
//!
//! ```
//! use aims_core::Did;
//!
//! let did = Did::parse("did:aims:web:example.com:shopping-assistant").unwrap();
//! assert_eq!(did.organization(), "example.com");
//! assert_eq!(
//!     did.resolve_url().as_deref(),
//!     Some("https://example.com/.well-known/aims/shopping-assistant.json")
//! );
//! ```

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Scheme prefix shared by every AIMS DID
pub const DID_PREFIX: &str = "did:aims:";

/// Method whose identifiers resolve to a well-known URL on the organization's domain
pub const WEB_METHOD: &str = "web";

/// A decentralized identifier naming an AI system
///
/// Every value satisfies the grammar, so `Did::parse(&did.to_string())`
/// always yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did {
    method: String,
    organization: String,
    system_id: String,
}

impl Did {
    /// Parse a full DID string such as `did:aims:web:example.com:my-agent`
    ///
    /// The whole input must match; there is no lenient or partial parsing.
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        let rest = input
            .strip_prefix(DID_PREFIX)
            .ok_or_else(|| FormatError::new(input))?;

        let mut parts = rest.split(':');
        let (Some(method), Some(organization), Some(system_id), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(FormatError::new(input));
        };

        if !is_method(method) || !is_organization(organization) || !is_system_id(system_id) {
            return Err(FormatError::new(input));
        }

        Ok(Self {
            method: method.to_string(),
            organization: organization.to_string(),
            system_id: system_id.to_string(),
        })
    }

    /// Build a DID from its components
    ///
    /// Components are checked against the same grammar as [`Did::parse`];
    /// the error cites the DID string the components would have produced.
    pub fn create(
        organization: impl Into<String>,
        system_id: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, FormatError> {
        let did = Self {
            method: method.into(),
            organization: organization.into(),
            system_id: system_id.into(),
        };

        if is_method(&did.method) && is_organization(&did.organization) && is_system_id(&did.system_id)
        {
            Ok(did)
        } else {
            Err(FormatError::new(did.to_string()))
        }
    }

    /// Build a `web`-method DID
    pub fn web(
        organization: impl Into<String>,
        system_id: impl Into<String>,
    ) -> Result<Self, FormatError> {
        Self::create(organization, system_id, WEB_METHOD)
    }

    /// Resolution method (`web`, `key`, ...)
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Organization identifier
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// System identifier within the organization
    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// Whether this DID uses the `web` method
    pub fn is_web(&self) -> bool {
        self.method == WEB_METHOD
    }

    /// URL of the document the organization hosts for this DID
    ///
    /// Only the `web` method defines a resolution mechanism; every other
    /// method returns `None`.
    pub fn resolve_url(&self) -> Option<String> {
        self.is_web().then(|| {
            format!(
                "https://{}/.well-known/aims/{}.json",
                self.organization, self.system_id
            )
        })
    }
}

fn is_method(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase())
}

fn is_organization(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}

fn is_system_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}:{}",
            DID_PREFIX, self.method, self.organization, self.system_id
        )
    }
}

impl FromStr for Did {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_web_did() {
        let did = Did::parse("did:aims:web:example.com:shopping-assistant").unwrap();
        assert_eq!(did.method(), "web");
        assert_eq!(did.organization(), "example.com");
        assert_eq!(did.system_id(), "shopping-assistant");
        assert!(did.is_web());
    }

    #[test]
    fn test_parse_valid_key_did() {
        let did = Did::parse("did:aims:key:z6MkTest:my_agent").unwrap();
        assert_eq!(did.method(), "key");
        assert_eq!(did.organization(), "z6MkTest");
        assert_eq!(did.system_id(), "my_agent");
        assert!(!did.is_web());
    }

    #[test]
    fn test_roundtrip() {
        for s in [
            "did:aims:web:mycompany.io:recommendation-engine",
            "did:aims:key:z6MkTest:agent_01",
            "did:aims:web:a-b.c-d.example:X",
            "did:aims:custom:ORG:sys-_9",
        ] {
            let did = Did::parse(s).unwrap();
            assert_eq!(did.to_string(), s);
            assert_eq!(Did::parse(&did.to_string()).unwrap(), did);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for s in [
            "",
            "not-a-did",
            "did:web:example.com:agent",
            "did:aims:web:example.com",
            "did:aims:web:example.com:",
            "did:aims::example.com:agent",
            "did:aims:Web:example.com:agent",
            "did:aims:w3b:example.com:agent",
            "did:aims:web:exa_mple.com:agent",
            "did:aims:web:example.com:my.agent",
            "did:aims:web:example.com:agent:extra",
            "did:aims:web:example.com:agent\n",
            " did:aims:web:example.com:agent",
            "DID:aims:web:example.com:agent",
            "did:aims:web:example.com/path:agent",
        ] {
            let err = Did::parse(s).unwrap_err();
            assert_eq!(err.input, s);
        }
    }

    #[test]
    fn test_create_web_did() {
        let did = Did::web("example.com", "my-agent").unwrap();
        assert_eq!(did.method(), "web");
        assert_eq!(did.to_string(), "did:aims:web:example.com:my-agent");
    }

    #[test]
    fn test_create_with_method() {
        let did = Did::create("z6MkKey", "secure-agent", "key").unwrap();
        assert_eq!(did.to_string(), "did:aims:key:z6MkKey:secure-agent");
    }

    #[test]
    fn test_create_validates_components() {
        let err = Did::create("example.com", "agent", "WEB").unwrap_err();
        assert_eq!(err.input, "did:aims:WEB:example.com:agent");
        assert!(Did::web("example.com:8080", "agent").is_err());
        assert!(Did::web("example.com", "").is_err());
    }

    #[test]
    fn test_resolve_url() {
        let did = Did::parse("did:aims:web:example.com:agent").unwrap();
        assert_eq!(
            did.resolve_url().as_deref(),
            Some("https://example.com/.well-known/aims/agent.json")
        );

        let did = Did::parse("did:aims:key:z6MkTest:agent").unwrap();
        assert_eq!(did.resolve_url(), None);
    }

    #[test]
    fn test_distinct_components_not_equal() {
        let a = Did::web("example.com", "agent").unwrap();
        let b = Did::web("example.com", "agent2").unwrap();
        let c = Did::create("example.com", "agent", "key").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_serde_as_string() {
        let did = Did::web("example.com", "agent").unwrap();
        let json = serde_json::to_string(&did).unwrap();
        assert_eq!(json, "\"did:aims:web:example.com:agent\"");

        let back: Did = serde_json::from_str(&json).unwrap();
        assert_eq!(back, did);

        assert!(serde_json::from_str::<Did>("\"did:aims:web:bad host:agent\"").is_err());
    }
}
