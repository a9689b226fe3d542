//! `gym`: command-line admin client for the gym server.
//!
//! # Usage
//!
//! ```text
//! gym --url http://localhost:8080 --user admin --password secret members
//! gym --config ~/.config/gym/config.toml ledger <member-id>
//! gym deactivate <member-id> "February 2024"
//! ```

mod client;
mod render;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use gym_core::{income::FeeSettings, month::YearMonth};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gym", about = "Admin client for the gym management server")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the gym server (default: http://localhost:8080).
  #[arg(long, env = "GYM_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "GYM_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "GYM_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List members with their status and number of unpaid months.
  Members,

  /// Show a member's monthly ledger.
  Ledger { id: Uuid },

  /// Mark one month's payment as paid.
  Pay {
    id:         Uuid,
    payment_id: String,
    /// Payment date (YYYY-MM-DD); the server's today if omitted.
    #[arg(long)]
    on:         Option<NaiveDate>,
  },

  /// Mark one month's payment as unpaid.
  Unpay { id: Uuid, payment_id: String },

  /// Mark a month inactive, e.g. `gym deactivate <id> "February 2024"`.
  Deactivate { id: Uuid, month: YearMonth },

  /// Mark a month active again.
  Activate { id: Uuid, month: YearMonth },

  /// Monthly income report.
  Income,

  /// Show the default fees, or change them.
  Fees {
    #[arg(long)]
    admission: Option<Decimal>,
    #[arg(long)]
    monthly:   Option<Decimal>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

/// Flag (or env var) if given, else the config file value if non-empty.
fn pick(flag: Option<String>, file: &str) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then(|| file.to_owned()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: pick(args.url, &file_cfg.url)
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(args.user, &file_cfg.username).unwrap_or_default(),
    password: pick(args.password, &file_cfg.password).unwrap_or_default(),
  };
  tracing::debug!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Members => {
      let members = client.list_members().await?;
      print!("{}", render::members(&members));
    }
    Command::Ledger { id } => {
      let ledger = client.ledger(id).await?;
      print!("{}", render::ledger(&ledger));
    }
    Command::Pay { id, payment_id, on } => {
      client.mark_paid(id, &payment_id, on).await?;
      print!("{}", render::ledger(&client.ledger(id).await?));
    }
    Command::Unpay { id, payment_id } => {
      client.mark_unpaid(id, &payment_id).await?;
      print!("{}", render::ledger(&client.ledger(id).await?));
    }
    Command::Deactivate { id, month } => {
      client.set_month(id, month, false).await?;
      print!("{}", render::ledger(&client.ledger(id).await?));
    }
    Command::Activate { id, month } => {
      client.set_month(id, month, true).await?;
      print!("{}", render::ledger(&client.ledger(id).await?));
    }
    Command::Income => {
      let report = client.income().await?;
      print!("{}", render::income(&report));
    }
    Command::Fees { admission, monthly } => {
      let current = client.fees().await?;
      let fees = if admission.is_none() && monthly.is_none() {
        current
      } else {
        let wanted = FeeSettings {
          admission_fee: admission.unwrap_or(current.admission_fee),
          monthly_fee:   monthly.unwrap_or(current.monthly_fee),
        };
        if wanted.admission_fee.is_sign_negative() || wanted.monthly_fee.is_sign_negative() {
          bail!("fees must not be negative");
        }
        client.set_fees(wanted).await?
      };
      println!("admission fee: {}", fees.admission_fee);
      println!("monthly fee:   {}", fees.monthly_fee);
    }
  }
  Ok(())
}
