#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use plm_config::Config;

mod physical_layer_tcp;

use physical_layer_tcp::{Endpoint, TcpPhysicalLayer};

#[derive(Parser, Debug)]
#[command(name = "plm-demo", about = "Physical layer monitor demo binary")]
struct Cli {
    /// Path to a Toml configuration file. Falls back to built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the monitor against a TCP server, accepting one inbound connection per open attempt.
    Listen,
    /// Run the monitor against a TCP client, connecting out to a remote address per open attempt.
    Connect,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    tracing::info!("Physical Layer Monitor demo starting up");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => plm_config::loaders::toml::from_file(path).unwrap_or_else(|err| {
            tracing::error!("failed to load config from {:?}: {}", path, err);
            std::process::exit(1);
        }),
        None => Config::default(),
    };

    let endpoint = match cli.command {
        Command::Listen => Endpoint::Listen(config.demo.listen_addr),
        Command::Connect => Endpoint::Connect(config.demo.connect_addr),
    };
    let retry_interval = config.monitor.retry_interval;

    plm_monitor::config_mngr::start(Arc::new(config));

    let layer: Box<dyn plm_monitor::physical_layer::PhysicalLayer + Send> =
        Box::new(TcpPhysicalLayer::new(endpoint));
    let handle = plm_monitor::spawn(layer, retry_interval);

    let handle_for_signal = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received shutdown signal");
            handle_for_signal.shutdown();
        }
    });

    handle.start();

    // Keep the process alive; the monitor's own event loop task and
    // the ctrl-c listener are what actually keep the runtime busy.
    std::future::pending::<()>().await;
}
