mod cmd_args;
mod commands;
mod config;
mod shell;
mod transport;
mod view;

use clap::Parser;
use todolist_core::{TodoClient, TodoService, TodoStore};
use tracing_subscriber::EnvFilter;

use cmd_args::CommandLineArgs;
use config::Config;
use transport::ReqwestTransport;

const LOG_LEVEL_ENV: &str = "TODOLIST_LOG_LEVEL";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing_subscriber();

    let args = CommandLineArgs::parse();
    let config = Config::from_args(&args)?;
    tracing::debug!(?config, "resolved configuration");

    let transport = ReqwestTransport::new(config.timeout)?;
    let service = TodoService::new(TodoClient::new(&config.base_url), transport);
    let store = TodoStore::with_user_id(service, config.user_id);

    let command = args.command.unwrap_or_default();
    let mut stdout = std::io::stdout();
    commands::run(&store, command, &mut stdout).await
}

/// Log to stderr so rendered output on stdout stays clean. The level comes
/// from `TODOLIST_LOG_LEVEL`, then `RUST_LOG`, and defaults to warnings.
fn init_tracing_subscriber() {
    let directives = std::env::var(LOG_LEVEL_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("{directives},hyper=warn,reqwest=warn,rustls=warn")))
        .with_writer(std::io::stderr)
        .init();
}
