// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

mod config;
mod publisher;

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use gridion_core::{Orchestrator, OrchestratorConfig, RefreshError};
use gridion_types::GridSnapshot;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    // Handle command line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" => {
                println!("GridION - UK grid telemetry aggregator");
                println!("Version: {VERSION}");
                println!();
                println!("Usage: gridion [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help    Print this help message");
                println!("  -v, --version Print version");
                return Ok(());
            }
            "--version" | "-v" => {
                println!("{VERSION}");
                return Ok(());
            }
            _ => {}
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(run())
}

async fn run() -> Result<()> {
    // Initialize tracing with env filter support; respects RUST_LOG
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = config::AppConfig::load()?;

    info!("🚀 Starting GridION v{VERSION}");
    info!("📋 Configuration Summary:");
    info!(
        "   Legacy API key: {}",
        if config.api_key.is_some() {
            "configured"
        } else {
            "not set (margin forecast and system warnings disabled)"
        }
    );
    match config.carbon_region_id {
        Some(region_id) => info!("   Carbon region: {region_id}"),
        None => info!("   Carbon region: national only"),
    }
    info!("   Snapshot path: {}", config.system.snapshot_path);
    info!("   Tick interval: {}s", config.system.update_interval_secs);

    let mut orchestrator = Orchestrator::new(OrchestratorConfig {
        api_key: config.api_key.clone(),
        carbon_region_id: config.carbon_region_id,
    })
    .context("Failed to build source clients")?;

    let snapshot_path = PathBuf::from(&config.system.snapshot_path);
    let mut previous: Option<GridSnapshot> = None;

    // Single-flight: one pass runs to completion before the next tick fires.
    let mut ticker = tokio::time::interval(config.update_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let now = Utc::now();

        match orchestrator.refresh(now, previous.as_ref()).await {
            Ok(snapshot) => {
                log_pass_summary(&snapshot);
                if let Err(e) = publisher::publish_snapshot(&snapshot, &snapshot_path) {
                    error!("Failed to publish snapshot: {e:#}");
                }
                previous = Some(snapshot);
            }
            Err(RefreshError::InvalidAuth) => {
                // Configuration problem, not a transient fault; looping on it
                // would hammer the endpoint with a bad key.
                anyhow::bail!(
                    "API credential rejected by upstream; update api_key in the configuration and restart"
                );
            }
        }
    }
}

fn log_pass_summary(snapshot: &GridSnapshot) {
    let populated = GridSnapshot::FIELD_PATHS
        .iter()
        .filter(|path| snapshot.field(path).is_some())
        .count();
    info!(
        "✅ Refresh pass complete: {populated}/{} display fields populated",
        GridSnapshot::FIELD_PATHS.len()
    );

    if let Some(frequency) = snapshot.grid_frequency {
        info!("   Grid frequency: {frequency:.2} Hz");
    }
    if let Some(price) = snapshot.sell_price {
        info!("   Sell price: {price:.2}");
    }
    if let Some(ref generation) = snapshot.grid_generation {
        info!(
            "   Generation: {} MW total, {:.1}% renewable",
            generation.total_generation_mwh, generation.renewable_percentage
        );
    }
    if let Some(ref warnings) = snapshot.system_warnings
        && let Some(ref current) = warnings.current
    {
        info!("⚠️  Active system warning: {}", current.warning_type);
    }
}
