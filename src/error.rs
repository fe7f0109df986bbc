use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential rejected: {message}{}", whitelist_hint(.source_ip))]
    Credential {
        message: String,
        /// Public IP of this host, looked up so the user can whitelist it.
        source_ip: Option<String>,
    },

    #[error("Exchange API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn whitelist_hint(source_ip: &Option<String>) -> String {
    match source_ip {
        Some(ip) => format!(" (requests originate from {ip} — add it to the key's IP whitelist)"),
        None => String::new(),
    }
}

impl AuditError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
