//! Summarist Server
//!
//! Serves the notes form and the JSON endpoints behind it.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use summarist::config::Settings;
use summarist::server::startup::start_server;

#[derive(Parser)]
#[command(name = "summarist_server")]
#[command(about = "Summarist form and REST server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
  /// Server bind address; overrides the settings file
  #[arg(long)]
  bind: Option<SocketAddr>,

  /// Path to a YAML settings file
  #[arg(long)]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("summarist=debug,tower_http=debug,info")
  } else {
    EnvFilter::new("summarist=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  let mut settings = Settings::load(args.config.as_deref())?;
  if let Some(bind) = args.bind {
    settings.server.bind = bind;
  }

  chronicle::info!("Starting Summarist Server v{}", env!("CARGO_PKG_VERSION"));
  chronicle::info!("Binding to address: {}", settings.server.bind);

  start_server(&settings).await?;

  Ok(())
}
