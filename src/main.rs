use clap::Parser;
use kanban::cli::{self, Cli};
use kanban::core::config::{self, KanbanConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let root = config::resolve_root(cli.root.as_deref());
    // A broken config surfaces when the store is opened; logging just falls back.
    let level = KanbanConfig::load(&root)
        .map(|c| c.log_level)
        .unwrap_or_else(|_| KanbanConfig::default().log_level);
    init_tracing(&level);

    cli::run(cli)?;
    Ok(())
}
