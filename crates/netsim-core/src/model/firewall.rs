// ── Firewall domain types ──

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

use super::entity_id::RuleId;
use crate::address::ANY;

/// Verdict of a firewall rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum FirewallAction {
    Accept,
    Drop,
}

/// One endpoint of a rule: the `any` wildcard or a literal address.
///
/// Literal addresses match by exact text, never by prefix or subnet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AddressMatch {
    Any,
    Exact(String),
}

impl AddressMatch {
    pub fn matches(&self, address: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(a) => a == address,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl fmt::Display for AddressMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY),
            Self::Exact(a) => f.write_str(a),
        }
    }
}

impl From<String> for AddressMatch {
    fn from(s: String) -> Self {
        if s == ANY { Self::Any } else { Self::Exact(s) }
    }
}

impl From<&str> for AddressMatch {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<AddressMatch> for String {
    fn from(m: AddressMatch) -> Self {
        match m {
            AddressMatch::Any => ANY.to_owned(),
            AddressMatch::Exact(a) => a,
        }
    }
}

/// A single (src, dst, action) rule attached to a router.
///
/// Rules are appended and deleted, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub id: RuleId,
    pub src: AddressMatch,
    pub dst: AddressMatch,
    pub action: FirewallAction,
}

impl FirewallRule {
    pub fn matches(&self, src: &str, dst: &str) -> bool {
        self.src.matches(src) && self.dst.matches(dst)
    }
}

/// A router's rule list, in the order the rules were entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirewallRules(Vec<FirewallRule>);

impl FirewallRules {
    /// Append a rule and return its id, one past the highest id in use.
    ///
    /// Returns `None`, leaving the list untouched, when the highest id is
    /// already `u64::MAX`.
    pub fn push(
        &mut self,
        src: impl Into<AddressMatch>,
        dst: impl Into<AddressMatch>,
        action: FirewallAction,
    ) -> Option<RuleId> {
        let id = match self.0.iter().map(|r| r.id.0).max() {
            Some(max) => RuleId(max.checked_add(1)?),
            None => RuleId(1),
        };
        self.0.push(FirewallRule {
            id,
            src: src.into(),
            dst: dst.into(),
            action,
        });
        Some(id)
    }

    /// Delete a rule by id, keeping the order of the rest.
    pub fn remove(&mut self, id: RuleId) -> Option<FirewallRule> {
        let index = self.0.iter().position(|r| r.id == id)?;
        Some(self.0.remove(index))
    }

    pub fn as_slice(&self) -> &[FirewallRule] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FirewallRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<FirewallRule>> for FirewallRules {
    fn from(rules: Vec<FirewallRule>) -> Self {
        Self(rules)
    }
}

impl<'a> IntoIterator for &'a FirewallRules {
    type Item = &'a FirewallRule;
    type IntoIter = std::slice::Iter<'a, FirewallRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
