use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use typeahead_core::config::Config;
use typeahead_core::{SearchViewModel, TokioScheduler};
use typeahead_tui::Theme;

#[derive(Parser)]
#[command(name = "typeahead", about = "Search-as-you-type over a remote car catalogue")]
struct Cli {
    /// Write debug logs to /tmp/typeahead-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Answer every query with itself instead of calling the backend.
    #[arg(long)]
    offline: bool,

    /// Override `[backend] base_url` from the config file.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Run one search without the TUI and print the results, one per line.
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// Colour theme for the TUI: `default` or `gruvbox`.
    #[arg(long, default_value = "default")]
    theme: String,

    /// Give up on a headless search after this many seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/typeahead-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("typeahead debug log started, tail -f /tmp/typeahead-debug.log");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config: unreadable, using defaults");
        Config::defaults()
    });
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let view_model = SearchViewModel::new(
        typeahead::search_client(&config.backend, cli.offline),
        Arc::new(TokioScheduler::current()),
        config.search.pipeline_settings(),
    );

    let outcome = match cli.query {
        Some(query) => runtime
            .block_on(typeahead::run_once(
                &view_model,
                &query,
                Duration::from_secs(cli.timeout),
            ))
            .map(|results| {
                for result in results {
                    println!("{result}");
                }
            })
            .map_err(anyhow::Error::from),
        None => typeahead_tui::run(&view_model, Theme::by_name(&cli.theme)),
    };

    runtime.block_on(view_model.shutdown());
    outcome
}
