use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{ClassifiedPermission, RiskLevel};
use crate::error::Result;
use crate::policy::Verdict;
use crate::recommend::RecommendationEntry;
use crate::AuditReport;

#[derive(Serialize)]
struct JsonReport<'a> {
    key: &'a str,
    key_created_at: Option<DateTime<Utc>>,
    permissions: &'a [ClassifiedPermission],
    risk_level: RiskLevel,
    recommendations: &'a [RecommendationEntry],
    verdict: &'a Verdict,
}

/// Render the audit as a JSON report.
pub fn render(report: &AuditReport) -> Result<String> {
    let json = JsonReport {
        key: &report.label,
        key_created_at: report.snapshot.created_at(),
        permissions: &report.classification.entries,
        risk_level: report.classification.risk_level,
        recommendations: &report.recommendations,
        verdict: &report.verdict,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
