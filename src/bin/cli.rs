use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keyaudit::classify::RiskLevel;
use keyaudit::config::Config;
use keyaudit::error::AuditError;
use keyaudit::output::OutputFormat;
use keyaudit::recommend;
use keyaudit::source::binance::{BinanceRestSource, Credentials};

#[derive(Parser)]
#[command(
    name = "keyaudit",
    about = "Exchange API-key permission auditor",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit one API key's permission flags
    Audit {
        /// API key, or set KEYAUDIT_API_KEY
        #[arg(long, env = "KEYAUDIT_API_KEY", hide_env_values = true)]
        api_key: String,

        /// API secret, or set KEYAUDIT_API_SECRET
        #[arg(long, env = "KEYAUDIT_API_SECRET", hide_env_values = true)]
        api_secret: String,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Minimum aggregate risk to fail (low, medium, high)
        #[arg(long)]
        fail_on: Option<String>,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the recommendation rules
    ListRules {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .keyaudit.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Audit {
            api_key,
            api_secret,
            config,
            format,
            fail_on,
            output,
        } => cmd_audit(api_key, api_secret, config, format, fail_on, output),
        Commands::ListRules { format } => cmd_list_rules(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Audit could not run: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_audit(
    api_key: String,
    api_secret: String,
    config_path: Option<PathBuf>,
    format_str: String,
    fail_on_str: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<i32, AuditError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let fail_on = fail_on_str.and_then(|s| {
        let level = RiskLevel::from_str_lenient(&s);
        if level.is_none() {
            eprintln!("Warning: unknown risk level '{}', using config default", s);
        }
        level
    });

    let config_path = config_path.unwrap_or_else(|| PathBuf::from(".keyaudit.toml"));
    let mut config = Config::load(&config_path)?;
    if let Some(fail_on) = fail_on {
        config.policy.fail_on = fail_on;
    }

    let credentials = Credentials {
        api_key,
        api_secret,
    };
    let source = BinanceRestSource::new(credentials, &config.api)?;

    let report = keyaudit::audit(&source, &config.policy)?;
    let rendered = keyaudit::render_report(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = risk at or above threshold
    Ok(if report.verdict.pass { 0 } else { 1 })
}

fn cmd_list_rules(format_str: String) -> Result<i32, AuditError> {
    let rules = recommend::rule_catalog();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&rules)?;
            println!("{}", json);
        }
        _ => {
            println!("{:<12} {:<32} {:<12} WHEN", "ID", "TITLE", "RISK");
            println!("{}", "-".repeat(80));
            for rule in &rules {
                println!(
                    "{:<12} {:<32} {:<12} {}",
                    rule.id,
                    rule.title,
                    rule.risk.to_string(),
                    rule.when,
                );
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, AuditError> {
    let path = PathBuf::from(".keyaudit.toml");

    if path.exists() && !force {
        eprintln!(".keyaudit.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .keyaudit.toml");

    Ok(0)
}
