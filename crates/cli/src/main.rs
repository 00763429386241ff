mod commands;
mod config;
mod ui;

use std::sync::Arc;

use anyhow::anyhow;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use ranking::{RankingAggregator, RedisRankingStore, SystemClock, Window};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "rankctl")]
#[command(about = "Daily, weekly and monthly leaderboards backed by Redis")]
#[command(version)]
#[command(after_help = "Examples:
  rankctl -n articles add post42           Add 1 to post42's score for today
  rankctl -n articles add post42 --by 5    Add 5
  rankctl -n articles top week             Top 10 of the current week
  rankctl -n articles top 30d -l 20        Top 20 of the last 30 days
  rankctl -n articles keys month           Show the keys a window reads")]
struct Cli {
    /// Ranking namespace (overrides RANKING_NAMESPACE)
    #[arg(short = 'n', long, global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add to an identity's score for today
    #[command(after_help = "Examples:
  rankctl add post42
  rankctl add post42 --by 2.5
  rankctl add post42 --by=-1")]
    Add {
        /// Identity to score (article id, user id, ...)
        identity: String,
        /// Amount to add
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        by: f64,
    },

    /// Show the highest-scoring identities of a window
    #[command(after_help = "Windows: today, yesterday, week, month, <n>d, YYYYMMDD, YYYY-MM-DD

Examples:
  rankctl top
  rankctl top yesterday
  rankctl top 7d --limit 20 --offset 20
  rankctl top 2024-03-01 --json")]
    Top {
        /// Window to rank
        #[arg(default_value = "today")]
        window: Window,
        /// Number of entries to show
        #[arg(short = 'l', long, default_value_t = 10)]
        limit: usize,
        /// Rank to start from (0-based)
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the keys a window reads and writes
    #[command(after_help = "Example: rankctl keys week")]
    Keys {
        /// Window to resolve
        #[arg(default_value = "today")]
        window: Window,
    },

    /// Check that the store is reachable
    #[command(after_help = "Example: rankctl ping")]
    Ping,

    /// Generate shell completions
    #[command(after_help = "Examples:
  rankctl completions bash > ~/.bash_completion.d/rankctl
  rankctl completions zsh > ~/.zfunc/_rankctl")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        ui::print_error(&err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let Cli { namespace, command } = Cli::parse();

    if let Commands::Completions { shell } = command {
        generate(shell, &mut Cli::command(), "rankctl", &mut std::io::stdout());
        return Ok(());
    }

    let config = envy::prefixed("RANKING_").from_env::<Config>()?;
    init_tracing(&config);
    let aggregator = connect(&config, namespace)?;

    match command {
        Commands::Add { identity, by } => commands::add::run(&aggregator, &identity, by).await,
        Commands::Top {
            window,
            limit,
            offset,
            json,
        } => commands::top::run(&aggregator, window, offset, limit, json).await,
        Commands::Keys { window } => commands::keys::run(&aggregator, window),
        Commands::Ping => commands::ping::run(&aggregator).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Builds the aggregator for the selected namespace. The Redis client is
/// owned here; the store only takes connections from it.
fn connect(config: &Config, namespace: Option<String>) -> anyhow::Result<RankingAggregator> {
    let namespace = namespace
        .or_else(|| config.namespace.clone())
        .ok_or_else(|| anyhow!("No namespace set. Pass --namespace or set RANKING_NAMESPACE"))?;

    let client = redis::Client::open(config.redis_url.as_str())?;
    let aggregator = RankingAggregator::new(namespace, Arc::new(RedisRankingStore::new(client)))
        .with_clock(Arc::new(SystemClock::new(config.day_boundary)))
        .with_options(config.aggregator_options());

    tracing::debug!(
        namespace = %aggregator.namespace(),
        today = %aggregator.today(),
        "aggregator ready"
    );
    Ok(aggregator)
}

/// JSON in production, human-readable otherwise. Always on stderr so command
/// output stays pipeable.
fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
