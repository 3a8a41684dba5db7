use std::sync::Arc;

use analysis_core::{AnalysisError, AnalyzedReport, ParsedAnalysis};
use analysis_orchestrator::plan_gate::apply_plan_gate;
use analysis_orchestrator::{AnalysisClient, AnalysisSession};
use anyhow::Result;
use clap::Parser;
use gemini_client::{GeminiClient, GeminiProvider};

mod cli;
mod config;

use cli::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    let cli = Cli::parse();
    match cli.command {
        Command::Stock(args) => {
            let session = build_session()?;
            let report = session
                .analyze_stock(args.into())
                .await
                .map_err(user_facing)?;
            print_report(&report, cli.json)?;
        }
        Command::Global(args) => {
            let params = args.into_params().await?;
            let session = build_session()?;
            let report = session.analyze_global(params).await.map_err(user_facing)?;
            print_report(&report, cli.json)?;
        }
        Command::Parse(args) => {
            let raw = args.read_input().await?;
            let mut parsed = response_parser::extract(&raw);
            if let Some(plan) = args.plan {
                if config::analysis_from_env()?.enforce_plan_limits {
                    apply_plan_gate(plan.into(), &mut parsed);
                }
            }
            print_parsed(&parsed, cli.json)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for the report
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_session() -> Result<AnalysisSession> {
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Model: {}", config.gemini.model);
    tracing::info!("  Request timeout: {:?}", config.analysis.request_timeout);
    tracing::info!("  Plan limits enforced: {}", config.analysis.enforce_plan_limits);

    let provider = GeminiProvider::from(GeminiClient::new(config.gemini)?);
    let client = AnalysisClient::new(Arc::new(provider), config.analysis);
    Ok(AnalysisSession::new(client))
}

fn user_facing(err: AnalysisError) -> anyhow::Error {
    tracing::error!("Analysis failed: {}", err);
    anyhow::anyhow!("{} ({:?})", err.user_message(), err.kind())
}

fn print_report(report: &AnalyzedReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report_export::render_text(report));
    }
    Ok(())
}

fn print_parsed(parsed: &ParsedAnalysis, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(parsed)?);
    } else {
        println!("{}", parsed.display_text);
        println!();
        println!("Extraction: {:?}", parsed.extraction);
        println!("Metrics: {}", serde_json::to_string_pretty(&parsed.metrics)?);
    }
    Ok(())
}
