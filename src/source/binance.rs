//! Signed fetch of a key's permission flags from the Binance REST API.

use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::blocking::Client;
use serde::Deserialize;
use sha2::Sha256;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{AuditError, Result};
use crate::snapshot::PermissionSnapshot;

use super::PermissionSource;

type HmacSha256 = Hmac<Sha256>;

const RESTRICTIONS_PATH: &str = "/sapi/v1/account/apiRestrictions";

/// Plain-text echo service used only to tell the user which IP to whitelist.
const IP_ECHO_URL: &str = "https://api.ipify.org";

/// Exchange error codes for a rejected key or caller IP.
const AUTH_ERROR_CODES: &[i64] = &[-2015, -1022];

/// API key / secret pair. Lives only inside the source; never logged.
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Masked form of the key for report headers.
    pub fn masked_key(&self) -> String {
        let tail: String = self
            .api_key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{tail}")
    }
}

/// Fetches `GET /sapi/v1/account/apiRestrictions`, signed with
/// HMAC-SHA256 over the query string.
pub struct BinanceRestSource {
    client: Client,
    base_url: Url,
    recv_window_ms: u64,
    credentials: Credentials,
}

impl BinanceRestSource {
    pub fn new(credentials: Credentials, api: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&api.base_url)
            .map_err(|e| AuditError::Config(format!("invalid base_url '{}': {e}", api.base_url)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            recv_window_ms: api.recv_window_ms,
            credentials,
        })
    }

    /// Best-effort public-IP lookup for the whitelist hint. A failure here
    /// must never mask the original fetch error.
    fn public_ip(&self) -> Option<String> {
        match self.client.get(IP_ECHO_URL).send().and_then(|r| r.text()) {
            Ok(ip) => Some(ip.trim().to_owned()),
            Err(e) => {
                tracing::debug!(error = %e, "public IP lookup failed");
                None
            }
        }
    }
}

impl PermissionSource for BinanceRestSource {
    fn label(&self) -> String {
        self.credentials.masked_key()
    }

    fn fetch(&self) -> Result<PermissionSnapshot> {
        let query = format!(
            "recvWindow={}&timestamp={}",
            self.recv_window_ms,
            Utc::now().timestamp_millis()
        );
        let signature = sign(&self.credentials.api_secret, &query);

        let mut url = self
            .base_url
            .join(RESTRICTIONS_PATH)
            .map_err(|e| AuditError::Config(format!("invalid endpoint URL: {e}")))?;
        url.set_query(Some(&format!("{query}&signature={signature}")));

        tracing::debug!(endpoint = RESTRICTIONS_PATH, "fetching permission snapshot");

        let response = self
            .client
            .get(url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(self.map_api_error(status.as_u16(), &body));
        }

        let restrictions: ApiRestrictions = serde_json::from_str(&body)?;
        Ok(build_snapshot(restrictions))
    }
}

impl BinanceRestSource {
    fn map_api_error(&self, status: u16, body: &str) -> AuditError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) if AUTH_ERROR_CODES.contains(&err.code) => AuditError::Credential {
                message: err.msg,
                source_ip: self.public_ip(),
            },
            Ok(err) => AuditError::Api {
                code: err.code,
                message: err.msg,
            },
            Err(_) => AuditError::Api {
                code: i64::from(status),
                message: body.trim().to_owned(),
            },
        }
    }
}

/// HMAC-SHA256 of the query string, hex-encoded, as the exchange expects.
fn sign(secret: &str, query: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

/// The apiRestrictions response. Every permission field is optional so a
/// missing field simply produces no snapshot entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRestrictions {
    create_time: Option<i64>,
    ip_restrict: Option<bool>,
    enable_reading: Option<bool>,
    enable_spot_and_margin_trading: Option<bool>,
    enable_margin: Option<bool>,
    enable_withdrawals: Option<bool>,
    enable_internal_transfer: Option<bool>,
    permits_universal_transfer: Option<bool>,
    enable_vanilla_options: Option<bool>,
    enable_futures: Option<bool>,
    enable_portfolio_margin_trading: Option<bool>,
    /// Flags this version does not know by name. Booleans are kept so the
    /// classifier's default bucket still reports them.
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Build the snapshot with known flags first, in the exchange's documented
/// order, then any unknown boolean flags.
fn build_snapshot(restrictions: ApiRestrictions) -> PermissionSnapshot {
    let mut snapshot = PermissionSnapshot::new();

    if let Some(ms) = restrictions.create_time {
        if let Some(created_at) = chrono::DateTime::from_timestamp_millis(ms) {
            snapshot.set_created_at(created_at);
        }
    }

    let known = [
        ("ipRestrict", restrictions.ip_restrict),
        ("enableReading", restrictions.enable_reading),
        (
            "enableSpotAndMarginTrading",
            restrictions.enable_spot_and_margin_trading,
        ),
        ("enableMargin", restrictions.enable_margin),
        ("enableWithdrawals", restrictions.enable_withdrawals),
        ("enableInternalTransfer", restrictions.enable_internal_transfer),
        (
            "permitsUniversalTransfer",
            restrictions.permits_universal_transfer,
        ),
        ("enableVanillaOptions", restrictions.enable_vanilla_options),
        ("enableFutures", restrictions.enable_futures),
        (
            "enablePortfolioMarginTrading",
            restrictions.enable_portfolio_margin_trading,
        ),
    ];
    for (name, value) in known {
        if let Some(enabled) = value {
            snapshot.push(name, enabled);
        }
    }

    for (name, value) in &restrictions.extra {
        if let Some(enabled) = value.as_bool() {
            snapshot.push(name.as_str(), enabled);
        }
    }

    snapshot
}
