//! Policy document model and loader.
//!
//! A policy document is YAML naming a policy, scoping it to an
//! enterprise and domain, and declaring its traffic rules:
//!
//! ```yaml
//! id: web-tier-ingress
//! name: Web tier ingress
//! enterprise: acme
//! domain: production
//! rules:
//!   - name: allow-https
//!     from: zone:dmz
//!     to: zone:web
//!     protocol: tcp
//!     port: "443"
//!     action: allow
//! ```
//!
//! Parsing is pure: no I/O, and the same text always produces the same
//! structured object. A parsed [`Policy`] always carries a non-empty
//! id, enterprise, and domain; rule contents may vary, including the
//! empty rule set.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enterprise: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub name: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Deny,
    Log,
}

impl Policy {
    /// Parse a policy document from raw YAML text.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        let policy: Policy = serde_yaml::from_str(text)?;
        policy.validate()?;
        Ok(policy)
    }

    /// The composite key addressing this policy on the service.
    pub fn key(&self) -> PolicyKey {
        PolicyKey::new(&self.id, &self.enterprise, &self.domain)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let fields = [
            ("id", &self.id),
            ("enterprise", &self.enterprise),
            ("domain", &self.domain),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(PolicyError::MissingField(name));
            }
        }
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(PolicyError::UnnamedRule);
            }
        }
        Ok(())
    }
}

/// Composite key uniquely addressing a policy for deletion.
///
/// Reconstructed from CLI input on every invocation; a key with any
/// empty component is rejected before any network call is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyKey {
    pub id: String,
    pub enterprise: String,
    pub domain: String,
}

impl PolicyKey {
    pub fn new(
        id: impl Into<String>,
        enterprise: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            enterprise: enterprise.into(),
            domain: domain.into(),
        }
    }

    /// The first empty component, named by its CLI flag, or `None` when
    /// the key is complete.
    pub fn missing_component(&self) -> Option<&'static str> {
        if self.id.trim().is_empty() {
            Some("policy-id")
        } else if self.enterprise.trim().is_empty() {
            Some("enterprise")
        } else if self.domain.trim().is_empty() {
            Some("domain")
        } else {
            None
        }
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (enterprise {}, domain {})",
            self.id, self.enterprise, self.domain
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("malformed policy document: {0}")]
    Malformed(#[from] serde_yaml::Error),

    #[error("policy document is missing a value for {0}")]
    MissingField(&'static str),

    #[error("policy document contains an unnamed rule")]
    UnnamedRule,
}
