//! Permission risk classification.
//!
//! A pure pass over one [`PermissionSnapshot`]: every flag gets a severity
//! tag from a total lookup, and the severities reduce to a single aggregate
//! risk level. No I/O, no state, safe to call any number of times.

use serde::{Deserialize, Serialize};

use crate::snapshot::{names, PermissionSnapshot};

/// Per-flag severity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Enabled and unremarkable — shown as "ON".
    Normal,
    /// Disabled — informational "OFF", never escalates risk.
    LowRiskOff,
    MediumRisk,
    HighRisk,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "on"),
            Self::LowRiskOff => write!(f, "off"),
            Self::MediumRisk => write!(f, "medium"),
            Self::HighRisk => write!(f, "high"),
        }
    }
}

/// Aggregate risk level for one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One classified flag, in snapshot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedPermission {
    pub name: String,
    pub enabled: bool,
    pub severity: Severity,
}

/// Output of [`classify`]: per-flag tags plus the aggregate level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub entries: Vec<ClassifiedPermission>,
    pub risk_level: RiskLevel,
}

/// Severity lookup, total over arbitrary flag names. Unknown names take the
/// default branch, so extending the exchange's flag set cannot break a run.
fn severity_for(name: &str, enabled: bool) -> Severity {
    if !enabled {
        return Severity::LowRiskOff;
    }
    match name {
        names::ENABLE_WITHDRAWALS => Severity::HighRisk,
        names::ENABLE_FUTURES | names::ENABLE_PORTFOLIO_MARGIN => Severity::MediumRisk,
        _ => Severity::Normal,
    }
}

/// What a severity contributes to the aggregate. Disabled flags and normal
/// enabled flags contribute nothing above the floor.
fn risk_contribution(severity: Severity) -> RiskLevel {
    match severity {
        Severity::HighRisk => RiskLevel::High,
        Severity::MediumRisk => RiskLevel::Medium,
        Severity::Normal | Severity::LowRiskOff => RiskLevel::Low,
    }
}

/// Classify every flag in the snapshot, in snapshot order.
///
/// The aggregate starts at [`RiskLevel::Low`] and only ever rises: the
/// reduction is a max, so it is idempotent and independent of flag order,
/// while the entry list still follows the snapshot exactly.
pub fn classify(snapshot: &PermissionSnapshot) -> Classification {
    let mut risk_level = RiskLevel::Low;
    let entries = snapshot
        .iter()
        .map(|(name, enabled)| {
            let severity = severity_for(name, enabled);
            risk_level = risk_level.max(risk_contribution(severity));
            ClassifiedPermission {
                name: name.to_owned(),
                enabled,
                severity,
            }
        })
        .collect();

    Classification {
        entries,
        risk_level,
    }
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

    #[test]
    fn withdrawals_enabled_is_high_risk() {
        let c = classify(&snapshot_of(&[(names::ENABLE_WITHDRAWALS, true)]));
        assert_eq!(c.entries[0].severity, Severity::HighRisk);
        assert_eq!(c.risk_level, RiskLevel::High);
    }

    #[test]
    fn futures_and_margin_are_medium_risk() {
        let c = classify(&snapshot_of(&[
            (names::ENABLE_FUTURES, true),
            (names::ENABLE_PORTFOLIO_MARGIN, true),
        ]));
        assert!(c.entries.iter().all(|e| e.severity == Severity::MediumRisk));
        assert_eq!(c.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn disabled_flags_never_escalate() {
        let c = classify(&snapshot_of(&[
            (names::ENABLE_WITHDRAWALS, false),
            (names::ENABLE_FUTURES, false),
            (names::IP_RESTRICT, false),
        ]));
        assert!(c.entries.iter().all(|e| e.severity == Severity::LowRiskOff));
        assert_eq!(c.risk_level, RiskLevel::Low);
    }

    #[test]
    fn unknown_enabled_flag_is_normal_and_harmless() {
        let c = classify(&snapshot_of(&[("enableTimeTravel", true)]));
        assert_eq!(c.entries[0].severity, Severity::Normal);
        assert_eq!(c.risk_level, RiskLevel::Low);
    }

    #[test]
    fn high_dominates_medium_regardless_of_order() {
        let forwards = classify(&snapshot_of(&[
            (names::ENABLE_FUTURES, true),
            (names::ENABLE_WITHDRAWALS, true),
        ]));
        let backwards = classify(&snapshot_of(&[
            (names::ENABLE_WITHDRAWALS, true),
            (names::ENABLE_FUTURES, true),
        ]));
        assert_eq!(forwards.risk_level, RiskLevel::High);
        assert_eq!(backwards.risk_level, RiskLevel::High);
    }

    #[test]
    fn entry_list_matches_snapshot_length_and_order() {
        let snapshot = snapshot_of(&[
            (names::IP_RESTRICT, false),
            (names::ENABLE_READING, true),
            (names::ENABLE_WITHDRAWALS, false),
        ]);
        let c = classify(&snapshot);
        assert_eq!(c.entries.len(), snapshot.len());
        let order: Vec<&str> = c.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                names::IP_RESTRICT,
                names::ENABLE_READING,
                names::ENABLE_WITHDRAWALS
            ]
        );
    }

    #[test]
    fn empty_snapshot_is_low_risk() {
        let c = classify(&PermissionSnapshot::new());
        assert!(c.entries.is_empty());
        assert_eq!(c.risk_level, RiskLevel::Low);
    }

    #[test]
    fn classification_is_idempotent() {
        let snapshot = snapshot_of(&[
            (names::ENABLE_WITHDRAWALS, true),
            (names::ENABLE_FUTURES, false),
            ("enableMargin", true),
        ]);
        assert_eq!(classify(&snapshot), classify(&snapshot));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_snapshot() -> impl Strategy<Value = PermissionSnapshot> {
            let name = prop_oneof![
                Just(names::IP_RESTRICT.to_owned()),
                Just(names::ENABLE_READING.to_owned()),
                Just(names::ENABLE_WITHDRAWALS.to_owned()),
                Just(names::ENABLE_FUTURES.to_owned()),
                Just(names::ENABLE_PORTFOLIO_MARGIN.to_owned()),
                "[a-zA-Z]{1,12}",
            ];
            proptest::collection::vec((name, any::<bool>()), 0..12).prop_map(|flags| {
                let mut snapshot = PermissionSnapshot::new();
                for (name, enabled) in flags {
                    snapshot.push(name, enabled);
                }
                snapshot
            })
        }

        proptest! {
            #[test]
            fn aggregate_is_exactly_the_highest_severity(snapshot in arb_snapshot()) {
                let c = classify(&snapshot);
                let any_high = c.entries.iter().any(|e| e.severity == Severity::HighRisk);
                let any_medium = c.entries.iter().any(|e| e.severity == Severity::MediumRisk);
                let expected = if any_high {
                    RiskLevel::High
                } else if any_medium {
                    RiskLevel::Medium
                } else {
                    RiskLevel::Low
                };
                prop_assert_eq!(c.risk_level, expected);
            }

            #[test]
            fn entry_list_preserves_snapshot_order(snapshot in arb_snapshot()) {
                let c = classify(&snapshot);
                prop_assert_eq!(c.entries.len(), snapshot.len());
                for (entry, (name, enabled)) in c.entries.iter().zip(snapshot.iter()) {
                    prop_assert_eq!(entry.name.as_str(), name);
                    prop_assert_eq!(entry.enabled, enabled);
                }
            }
        }
    }
}
