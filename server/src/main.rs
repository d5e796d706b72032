//! Ttobak API server
//!
//! Serves the entitlement-gated transform API and the checkout endpoints.
//!
//! Usage:
//!   OPENAI_API_KEY=sk-... ttobak-server --port 3000 --database ttobak.db

use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use ttobak_billing::PolarClient;
use ttobak_entitlement::EntitlementEvaluator;
use ttobak_server::{build_router, AppState, Args, SupabaseAuth};
use ttobak_store::RecordDb;
use ttobak_transform::{OpenAiGenerator, Transformer};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Ttobak server starting...");

    let db = RecordDb::open(&args.database)
        .with_context(|| format!("Failed to open database at {}", args.database.display()))?;
    let generator =
        OpenAiGenerator::new(args.generator_config()).context("Failed to create generator")?;
    let auth = SupabaseAuth::new(args.supabase_config());
    if !auth.is_configured() {
        info!("Supabase not configured, serving anonymous devices only");
    }

    let state = Arc::new(AppState::new(
        db,
        EntitlementEvaluator::new(args.policy()),
        Transformer::new(Arc::new(generator)),
        PolarClient::new(args.polar_config()),
        auth,
    ));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", args.port))?;

    println!("\n========================================");
    println!("  Ttobak Server Running");
    println!("========================================");
    println!("  HTTP Port:  {}", args.port);
    println!("  Database:   {}", args.database.display());
    println!("  Model:      {}", args.model);
    println!("  Free limit: {}", args.free_limit);
    println!("========================================\n");

    info!("HTTP API listening on port {}", args.port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
