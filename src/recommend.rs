//! Remediation advice.
//!
//! A fixed table of independent predicate→template rules, evaluated against
//! one [`PermissionSnapshot`] in declaration order. Each rule fires at most
//! once and firing one never suppresses another. Absent flags read as
//! disabled, so the rules are total over any flag set.
//!
//! These rules annotate the report only; the aggregate risk level comes
//! solely from [`crate::classify`].

use serde::Serialize;

use crate::snapshot::{names, PermissionSnapshot};

/// Risk wording attached to a recommendation template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskWording {
    Low,
    MediumHigh,
    High,
}

impl std::fmt::Display for RiskWording {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::MediumHigh => write!(f, "medium-high"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One remediation suggestion. All text is a fixed template selected by the
/// rule, never computed from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationEntry {
    /// Stable rule identifier (e.g. "AUDIT-001").
    pub id: &'static str,
    pub title: &'static str,
    pub reason: &'static str,
    pub risk: RiskWording,
    pub action: &'static str,
}

/// Rule metadata for `list-rules` output.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub risk: RiskWording,
    pub when: &'static str,
}

struct Rule {
    trigger: fn(&PermissionSnapshot) -> bool,
    /// Human description of the trigger, for `list-rules`.
    when: &'static str,
    entry: RecommendationEntry,
}

/// Emission order is part of the contract: the report always lists advice
/// in this order.
static RULES: [Rule; 5] = [
    Rule {
        trigger: |s| s.is_enabled(names::ENABLE_WITHDRAWALS),
        when: "withdrawals are enabled",
        entry: RecommendationEntry {
            id: "AUDIT-001",
            title: "Disable withdrawals",
            reason: "The key can move funds off the exchange if it leaks.",
            risk: RiskWording::High,
            action: "Turn the withdrawal permission off immediately; issue a \
                     separate, IP-locked key if transfers are genuinely needed.",
        },
    },
    Rule {
        trigger: |s| !s.is_enabled(names::IP_RESTRICT),
        when: "the key is not IP-restricted",
        entry: RecommendationEntry {
            id: "AUDIT-002",
            title: "Enable the IP whitelist",
            reason: "Without an IP restriction, anyone holding the key material \
                     can use it from anywhere.",
            risk: RiskWording::MediumHigh,
            action: "Restrict the key to the fixed egress addresses of the \
                     hosts that need it.",
        },
    },
    Rule {
        trigger: |s| !s.is_enabled(names::ENABLE_READING),
        when: "reading is disabled",
        entry: RecommendationEntry {
            id: "AUDIT-003",
            title: "Enable read-only access",
            reason: "Reading is disabled, so balance and order queries fail \
                     for auditing tools.",
            risk: RiskWording::Low,
            action: "Turn the reading permission on for monitoring and audit \
                     tooling.",
        },
    },
    Rule {
        trigger: |s| s.is_enabled(names::ENABLE_FUTURES),
        when: "futures trading is enabled",
        entry: RecommendationEntry {
            id: "AUDIT-004",
            title: "Futures trading is enabled",
            reason: "A leaked key could open leveraged positions.",
            risk: RiskWording::High,
            action: "Disable futures unless a trusted bot on a locked-down \
                     host requires it.",
        },
    },
    Rule {
        trigger: |s| s.is_enabled(names::ENABLE_PORTFOLIO_MARGIN),
        when: "portfolio margin trading is enabled",
        entry: RecommendationEntry {
            id: "AUDIT-005",
            title: "Portfolio margin is enabled",
            reason: "Margin across the whole portfolio multiplies the damage \
                     a leaked key can do.",
            risk: RiskWording::High,
            action: "Disable portfolio margin unless it is used from a \
                     trusted environment.",
        },
    },
];

/// Evaluate every rule against the snapshot, in table order.
pub fn recommend(snapshot: &PermissionSnapshot) -> Vec<RecommendationEntry> {
    RULES
        .iter()
        .filter(|rule| (rule.trigger)(snapshot))
        .map(|rule| rule.entry)
        .collect()
}

/// Metadata for every rule, in emission order.
pub fn rule_catalog() -> Vec<RuleInfo> {
    RULES
        .iter()
        .map(|rule| RuleInfo {
            id: rule.entry.id,
            title: rule.entry.title,
            risk: rule.entry.risk,
            when: rule.when,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot_of(flags: &[(&str, bool)]) -> PermissionSnapshot {
        let mut snapshot = PermissionSnapshot::new();
        for (name, enabled) in flags {
            snapshot.push(*name, *enabled);
        }
        snapshot
    }

    fn ids(entries: &[RecommendationEntry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn locked_down_key_yields_no_advice() {
        let snapshot = snapshot_of(&[
            (names::IP_RESTRICT, true),
            (names::ENABLE_READING, true),
            (names::ENABLE_WITHDRAWALS, false),
            (names::ENABLE_FUTURES, false),
            (names::ENABLE_PORTFOLIO_MARGIN, false),
        ]);
        assert!(recommend(&snapshot).is_empty());
    }

    #[test]
    fn unrestricted_key_gets_only_the_whitelist_entry() {
        let snapshot = snapshot_of(&[
            (names::IP_RESTRICT, false),
            (names::ENABLE_READING, true),
            (names::ENABLE_WITHDRAWALS, false),
            (names::ENABLE_FUTURES, false),
            (names::ENABLE_PORTFOLIO_MARGIN, false),
        ]);
        assert_eq!(ids(&recommend(&snapshot)), vec!["AUDIT-002"]);
    }

    #[test]
    fn withdrawal_advice_comes_first() {
        let snapshot = snapshot_of(&[
            (names::IP_RESTRICT, false),
            (names::ENABLE_READING, true),
            (names::ENABLE_WITHDRAWALS, true),
        ]);
        let entries = recommend(&snapshot);
        assert_eq!(ids(&entries), vec!["AUDIT-001", "AUDIT-002"]);
        assert_eq!(entries[0].risk, RiskWording::High);
    }

    #[test]
    fn fully_open_but_restricted_key_emits_three_entries_in_order() {
        let snapshot = snapshot_of(&[
            (names::IP_RESTRICT, true),
            (names::ENABLE_READING, true),
            (names::ENABLE_WITHDRAWALS, true),
            (names::ENABLE_FUTURES, true),
            (names::ENABLE_PORTFOLIO_MARGIN, true),
        ]);
        assert_eq!(
            ids(&recommend(&snapshot)),
            vec!["AUDIT-001", "AUDIT-004", "AUDIT-005"]
        );
    }

    #[test]
    fn empty_snapshot_triggers_whitelist_and_read_only() {
        let entries = recommend(&PermissionSnapshot::new());
        assert_eq!(ids(&entries), vec!["AUDIT-002", "AUDIT-003"]);
    }

    #[test]
    fn rules_fire_independently() {
        let base = snapshot_of(&[
            (names::IP_RESTRICT, true),
            (names::ENABLE_READING, true),
            (names::ENABLE_FUTURES, true),
        ]);
        let mut toggled = PermissionSnapshot::new();
        toggled.push(names::IP_RESTRICT, true);
        toggled.push(names::ENABLE_READING, true);
        toggled.push(names::ENABLE_FUTURES, true);
        toggled.push(names::ENABLE_WITHDRAWALS, true);

        let before = recommend(&base);
        let after = recommend(&toggled);
        // Only the withdrawal rule reacts to the toggled flag.
        assert_eq!(ids(&before), vec!["AUDIT-004"]);
        assert_eq!(ids(&after), vec!["AUDIT-001", "AUDIT-004"]);
    }

    #[test]
    fn unknown_flags_trigger_nothing() {
        let snapshot = snapshot_of(&[
            (names::IP_RESTRICT, true),
            (names::ENABLE_READING, true),
            ("enableTimeTravel", true),
        ]);
        assert!(recommend(&snapshot).is_empty());
    }

    #[test]
    fn catalog_lists_all_rules_in_emission_order() {
        let catalog = rule_catalog();
        let catalog_ids: Vec<&str> = catalog.iter().map(|r| r.id).collect();
        assert_eq!(
            catalog_ids,
            vec!["AUDIT-001", "AUDIT-002", "AUDIT-003", "AUDIT-004", "AUDIT-005"]
        );
    }
}
