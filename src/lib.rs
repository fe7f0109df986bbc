//! keyaudit — Exchange API-key permission auditor.
//!
//! Fetches one credential's permission flags from the exchange, classifies
//! them into an aggregate risk level, and emits remediation advice. The
//! classification and recommendation passes are pure functions of the
//! fetched snapshot; transport, signing, and rendering live at the edges.
//!
//! # Quick Start
//!
//! ```no_run
//! use keyaudit::config::Config;
//! use keyaudit::source::binance::{BinanceRestSource, Credentials};
//!
//! let config = Config::default();
//! let credentials = Credentials {
//!     api_key: "…".into(),
//!     api_secret: "…".into(),
//! };
//! let source = BinanceRestSource::new(credentials, &config.api).unwrap();
//! let report = keyaudit::audit(&source, &config.policy).unwrap();
//! println!("risk: {}, advice: {}", report.classification.risk_level, report.recommendations.len());
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod output;
pub mod policy;
pub mod recommend;
pub mod snapshot;
pub mod source;

use classify::Classification;
use error::Result;
use output::OutputFormat;
use policy::{Policy, Verdict};
use recommend::RecommendationEntry;
use snapshot::PermissionSnapshot;
use source::PermissionSource;

/// Complete audit report for one credential.
#[derive(Debug)]
pub struct AuditReport {
    /// Masked credential label, safe to print.
    pub label: String,
    pub snapshot: PermissionSnapshot,
    pub classification: Classification,
    pub recommendations: Vec<RecommendationEntry>,
    pub verdict: Verdict,
}

/// Run a complete audit: fetch the snapshot, classify, recommend, evaluate.
///
/// Classification and recommendation consume the same snapshot
/// independently; a fetch failure aborts before either runs, so a failed
/// audit can never fabricate a risk level.
pub fn audit(source: &dyn PermissionSource, policy: &Policy) -> Result<AuditReport> {
    let snapshot = source.fetch()?;

    let classification = classify::classify(&snapshot);
    let recommendations = recommend::recommend(&snapshot);
    let verdict = policy.evaluate(classification.risk_level);

    Ok(AuditReport {
        label: source.label(),
        snapshot,
        classification,
        recommendations,
        verdict,
    })
}

/// Render an audit report in the specified format.
pub fn render_report(report: &AuditReport, format: OutputFormat) -> Result<String> {
    output::render(report, format)
}
