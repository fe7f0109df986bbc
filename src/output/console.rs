use crate::classify::Severity;
use crate::AuditReport;

/// Render the audit as plain console text: one tagged line per flag in
/// snapshot order, then the numbered recommendations, then the verdict.
pub fn render(report: &AuditReport) -> String {
    let mut output = String::new();

    match report.snapshot.created_at() {
        Some(created_at) => output.push_str(&format!(
            "\n  Key {} (created {}):\n\n",
            report.label,
            created_at.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => output.push_str(&format!("\n  Key {}:\n\n", report.label)),
    }

    if report.classification.entries.is_empty() {
        output.push_str("  No permission flags returned for this key.\n");
    }

    let width = report
        .classification
        .entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0);

    for entry in &report.classification.entries {
        let tag = match entry.severity {
            Severity::HighRisk => "[HIGH]  ",
            Severity::MediumRisk => "[MEDIUM]",
            Severity::Normal => "[ON]    ",
            Severity::LowRiskOff => "[OFF]   ",
        };
        let state = if entry.enabled { "enabled" } else { "disabled" };
        output.push_str(&format!(
            "  {} {:<width$}  {}\n",
            tag, entry.name, state
        ));
    }

    output.push_str(&format!(
        "\n  Aggregate risk: {}\n",
        report.classification.risk_level.to_string().to_uppercase()
    ));

    if report.recommendations.is_empty() {
        output.push_str("\n  No recommendations — the key is locked down.\n");
    } else {
        output.push_str(&format!(
            "\n  {} recommendation(s):\n\n",
            report.recommendations.len()
        ));
        for (i, rec) in report.recommendations.iter().enumerate() {
            output.push_str(&format!(
                "  {}. [{}] {}\n",
                i + 1,
                rec.risk.to_string().to_uppercase(),
                rec.title
            ));
            output.push_str(&format!("     why: {}\n", rec.reason));
            output.push_str(&format!("     fix: {}\n", rec.action));
        }
    }

    let status = if report.verdict.pass { "PASS" } else { "FAIL" };
    output.push_str(&format!(
        "\n  Result: {} (risk: {}, threshold: {})\n\n",
        status, report.verdict.risk_level, report.verdict.fail_threshold
    ));

    output
}
