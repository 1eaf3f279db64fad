//! agentlens - Terminal analytics dashboard for conversational agents

use agentlens_core::{
    insights, AnalyticsClient, PollParams, Poller, PollerConfig, SnapshotStore, TrailingWindow,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agentlens",
    version,
    about = "Terminal analytics dashboard for conversational agents",
    long_about = "Polls an analytics service and renders conversation volume, sentiment,\n\
                  resolution rate and per-model costs for one agent.\n\
                  \n\
                  Examples:\n\
                    agentlens agent-1 --base-url http://localhost:8000/api/v1\n\
                    agentlens agent-1 --window 7          # 7-day trailing window\n\
                    agentlens agent-1 snapshot            # One fetch, print and exit\n\
                    agentlens agent-1 snapshot --json     # Machine-readable output\n\
                  \n\
                  Environment Variables:\n\
                    AGENTLENS_BASE_URL               # Analytics service root URL\n\
                    RUST_LOG                         # Log filter (logs go to stderr)"
)]
struct Cli {
    /// Agent whose analytics to display
    agent_id: String,

    #[command(subcommand)]
    mode: Option<Mode>,

    /// Analytics service root URL, e.g. http://localhost:8000/api/v1
    #[arg(long, env = "AGENTLENS_BASE_URL")]
    base_url: String,

    /// Trailing window in days (7, 30 or 90)
    #[arg(long, default_value = "30")]
    window: u32,

    /// Seconds between background refresh cycles
    #[arg(long, default_value = "30")]
    refresh_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the dashboard (default)
    Tui,
    /// Fetch one snapshot, print it and exit
    Snapshot {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `snapshot --json` stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let window = TrailingWindow::from_days(cli.window).context("Invalid --window")?;
    let client = AnalyticsClient::new(&cli.base_url, Duration::from_secs(cli.timeout_secs))
        .context("Failed to build HTTP client")?;

    match cli.mode.unwrap_or(Mode::Tui) {
        Mode::Tui => run_tui(client, cli.agent_id, window, cli.refresh_secs).await,
        Mode::Snapshot { json } => run_snapshot(client, cli.agent_id, window, json).await,
    }
}

async fn run_tui(
    client: AnalyticsClient,
    agent_id: String,
    window: TrailingWindow,
    refresh_secs: u64,
) -> Result<()> {
    let store = Arc::new(SnapshotStore::new());
    info!(agent = %agent_id, days = window.days(), "Starting dashboard");

    let poller = Poller::spawn(
        client,
        Arc::clone(&store),
        PollParams::new(agent_id.clone(), window),
        PollerConfig {
            refresh_interval: Duration::from_secs(refresh_secs),
        },
    );

    agentlens_tui::run(store, poller, agent_id, window).await
}

async fn run_snapshot(
    client: AnalyticsClient,
    agent_id: String,
    window: TrailingWindow,
    json: bool,
) -> Result<()> {
    let params = PollParams::new(agent_id.clone(), window);
    let snapshot = agentlens_core::poller::fetch_snapshot(&client, &params)
        .await
        .with_context(|| format!("Failed to fetch analytics for {}", agent_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let summary = &snapshot.trends.summary;

    println!("agentlens - {} ({})", agent_id, window.display());
    println!("=========================================");
    println!();
    println!("Active Conversations:  {}", snapshot.realtime.active_conversations);
    println!("Total Conversations:   {}", summary.total_conversations);
    println!("Total Messages:        {}", summary.total_messages);
    println!(
        "Avg Sentiment:         {:.1}%  ({})",
        summary.avg_sentiment * 100.0,
        summary.sentiment_trend.as_label()
    );
    println!("Avg Resolution Rate:   {:.1}%", summary.avg_resolution_rate);
    println!(
        "Total Cost:            ${:.2}  ({})",
        summary.total_cost,
        summary.cost_trend.as_label()
    );
    println!(
        "Cost / Conversation:   {}",
        insights::format_cost_per_conversation(summary)
    );
    println!(
        "Messages / Day:        {}",
        insights::messages_per_day(summary, window.days())
    );

    if !snapshot.costs.models.is_empty() {
        println!();
        println!("Models:");
        for entry in &snapshot.costs.models {
            println!(
                "  {}: {} requests, ${:.4} (${:.6}/req)",
                entry.model, entry.requests, entry.total_cost, entry.avg_cost_per_request
            );
        }
        println!(
            "  Total: ${:.2} over {} requests",
            snapshot.costs.total_cost, snapshot.costs.total_requests
        );
    }

    Ok(())
}
