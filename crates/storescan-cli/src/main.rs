//! storescan - 買い物リストを複数店舗のカタログで評価する対話 CLI
//!
//! 設定の優先順位: コマンドライン引数 > 環境変数（`STORESCAN_*`）> `--config` の TOML > 既定値

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storescan_core::EvaluationConfig;
use storescan_core::app::Session;
use storescan_core::impls::ConsolePrompt;

/// Command-line arguments for storescan
#[derive(Parser, Debug)]
#[command(name = "storescan")]
#[command(about = "Evaluate a shopping list against every store catalog and pick one")]
#[command(version)]
struct Args {
    /// Directory holding Store1..StoreN catalogs
    #[arg(long, env = "STORESCAN_CATALOG_ROOT")]
    catalog_root: Option<PathBuf>,

    /// Directory for activity logs
    #[arg(long, env = "STORESCAN_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Number of stores to evaluate
    #[arg(long, env = "STORESCAN_STORES")]
    stores: Option<usize>,

    /// Subcategories scanned per store at most
    #[arg(long, env = "STORESCAN_MAX_SUBCATEGORIES")]
    max_subcategories: Option<usize>,

    /// Catalog entries scanned per subcategory at most
    #[arg(long, env = "STORESCAN_MAX_ENTRIES")]
    max_entries: Option<usize>,

    /// TOML configuration file
    #[arg(short, long, env = "STORESCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Write the session report as JSON to this file
    #[arg(long)]
    report_json: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> Result<EvaluationConfig> {
        let mut config = match &self.config {
            Some(path) => EvaluationConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EvaluationConfig::default(),
        };
        if let Some(root) = &self.catalog_root {
            config.catalog_root = root.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(stores) = self.stores {
            config.store_count = stores;
        }
        if let Some(n) = self.max_subcategories {
            config.max_subcategories = n;
        }
        if let Some(n) = self.max_entries {
            config.max_entries_per_subcategory = n;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ユーザーとの対話は stdout、診断ログは stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storescan=info,storescan_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    info!(
        catalog_root = %config.catalog_root.display(),
        log_dir = %config.log_dir.display(),
        stores = config.store_count,
        "configuration resolved"
    );

    let session = Session::new(config);
    let report = match session.run(Box::new(ConsolePrompt::new())).await {
        Ok(report) => report,
        Err(err) => {
            error!(kind = ?err.kind(), error = %err, "session aborted");
            return Err(err).context("Evaluation session failed");
        }
    };

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(path = %path.display(), "session report written");
    }

    info!(run_id = %report.run_id, log = %report.log_path.display(), "session complete");
    Ok(())
}
