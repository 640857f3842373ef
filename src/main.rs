//! Leadboard CLI.
//!
//! Usage:
//!   leadboard [--config <path>]           print one snapshot as JSON
//!   leadboard --watch [--config <path>]   keep polling, log a line per cycle
//!
//! Connection settings come from ~/.leadboard/config.json (or `--config` /
//! `LEADBOARD_CONFIG`) and `NOCODB_*` environment variables. Set `RUST_LOG=debug` for per-page logging.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use leadboard_lib::error::{SyncError, SyncErrorPayload};
use leadboard_lib::nocodb::{load_config, poller::run_leads_poller};
use leadboard_lib::snapshot::get_leads_snapshot;
use leadboard_lib::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "leadboard")]
#[command(about = "Mirror a NocoDB leads table and report outreach analytics", long_about = None)]
#[command(version)]
struct CliArgs {
    /// Keep polling instead of printing one snapshot
    #[arg(long)]
    watch: bool,

    /// Config file (defaults to ~/.leadboard/config.json)
    #[arg(long, env = "LEADBOARD_CONFIG")]
    config: Option<PathBuf>,
}

fn report(err: &SyncError) {
    let payload = SyncErrorPayload::from(err);
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report(&SyncError::from(e));
            return ExitCode::FAILURE;
        }
    };

    if args.watch {
        let state = Arc::new(AppState::new(config));
        run_leads_poller(state).await;
        return ExitCode::SUCCESS;
    }

    match get_leads_snapshot(&config, chrono::Utc::now()).await {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize snapshot: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("Lead fetch failed: {}", e);
            report(&e);
            ExitCode::FAILURE
        }
    }
}
