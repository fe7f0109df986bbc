//! Point-in-time view of one credential's permission flags.

use chrono::{DateTime, Utc};

/// Canonical flag names as the exchange reports them.
pub mod names {
    pub const IP_RESTRICT: &str = "ipRestrict";
    pub const ENABLE_READING: &str = "enableReading";
    pub const ENABLE_WITHDRAWALS: &str = "enableWithdrawals";
    pub const ENABLE_FUTURES: &str = "enableFutures";
    pub const ENABLE_PORTFOLIO_MARGIN: &str = "enablePortfolioMarginTrading";
}

/// The complete set of permission flags for one credential, captured once
/// per audit run by the fetch collaborator and read-only afterwards.
///
/// Flag order is preserved from the source because it is user-visible in
/// the report. The creation timestamp is metadata, not a permission, and
/// is excluded from classification.
#[derive(Debug, Clone, Default)]
pub struct PermissionSnapshot {
    flags: Vec<(String, bool)>,
    created_at: Option<DateTime<Utc>>,
}

impl PermissionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a flag, keeping source order. A repeated name is ignored so
    /// each permission classifies exactly once.
    pub fn push(&mut self, name: impl Into<String>, enabled: bool) {
        let name = name.into();
        if self.flags.iter().any(|(n, _)| *n == name) {
            return;
        }
        self.flags.push((name, enabled));
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = Some(created_at);
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Whether a flag is enabled. Absent flags read as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags
            .iter()
            .find(|(n, _)| n == name)
            .is_some_and(|(_, enabled)| *enabled)
    }

    /// Flags in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(n, e)| (n.as_str(), *e))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
