//! First-match packet filter evaluated at a gateway router.
//!
//! Rules are scanned in insertion order and the first rule whose source and
//! destination both match decides the verdict. When nothing matches the
//! packet is accepted, so an empty rule list never blocks traffic.

use crate::model::{FirewallAction, FirewallRule};

/// Verdict used when no rule matches.
pub const DEFAULT_ACTION: FirewallAction = FirewallAction::Accept;

/// First rule matching `(src, dst)`, if any.
pub fn first_match<'a>(rules: &'a [FirewallRule], src: &str, dst: &str) -> Option<&'a FirewallRule> {
    rules.iter().find(|rule| rule.matches(src, dst))
}

/// Decide the fate of a packet from `src` to `dst`.
pub fn evaluate(rules: &[FirewallRule], src: &str, dst: &str) -> FirewallAction {
    first_match(rules, src, dst).map_or(DEFAULT_ACTION, |rule| rule.action)
}
