use serde::{Deserialize, Serialize};

use crate::classify::RiskLevel;

/// Audit verdict — the pass/fail decision for CI use, derived from the
/// aggregate risk level alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub pass: bool,
    pub risk_level: RiskLevel,
    pub fail_threshold: RiskLevel,
}

/// Policy configuration loaded from `.keyaudit.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Minimum aggregate risk level that fails the audit.
    #[serde(default = "default_fail_on")]
    pub fail_on: RiskLevel,
}

fn default_fail_on() -> RiskLevel {
    RiskLevel::High
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            fail_on: RiskLevel::High,
        }
    }
}

impl Policy {
    pub fn evaluate(&self, risk_level: RiskLevel) -> Verdict {
        Verdict {
            pass: risk_level < self.fail_on,
            risk_level,
            fail_threshold: self.fail_on,
        }
    }
}
