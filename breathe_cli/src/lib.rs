use std::io;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

mod commands;
mod config;
mod logging;
mod styles;

pub use logging::Color;

const LOG_ENV_VAR: &str = "BREATHE_LOG";

#[derive(Parser)]
#[command(name = "breathe")]
#[command(version, about, long_about = None)]
#[command(styles = styles::get_styles())]
struct BreatheCli {
    /// Use colors in log output
    #[arg(long, value_enum, global = true, default_value_t = Color::Auto)]
    color: Color,
    #[command(subcommand)]
    command: Commands,
}

fn init_logger(color: Color) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(color.use_colors())
            .with_target(true),
    );

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

pub fn run_cli() -> anyhow::Result<()> {
    let args = BreatheCli::parse();
    init_logger(args.color)?;

    args.command.run()
}
