use clap::{Parser, Subcommand};
use peerlink::common::config::{apply_overrides, load_config, ConfigOverrides};
use peerlink::server::runtime;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "peerlink")]
#[command(about = "Ephemeral file relay: share a file with a one-time code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay server
    Serve {
        #[arg(long, help = "Port for the HTTP API")]
        port: Option<u16>,

        #[arg(long, help = "Directory uploads are staged in")]
        upload_dir: Option<PathBuf>,

        #[arg(long, help = "Path to a config file")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            upload_dir,
            config,
        } => {
            let overrides = ConfigOverrides { port, upload_dir };
            let config = apply_overrides(load_config(config.as_deref())?, &overrides)?;

            let (port, handle) = runtime::start_server(&config).await?;
            tracing::info!("peerlink server started on port {port}");

            runtime::wait_for_shutdown(handle).await;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("peerlink=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
