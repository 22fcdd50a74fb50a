use clap::{Parser, Subcommand};
use normobot::{config::Config, create_router, utils::init_logger, AppState, Dispatcher, Envelope};
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "normobot", version, about = "Technical specification review bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the PORT setting
        #[arg(long)]
        port: Option<u16>,
    },
    /// Dispatch a single envelope and print the transport response
    Invoke {
        /// Envelope JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        envelope: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    if config.telegram.token.is_none() {
        warn!("TELEGRAM_BOT_TOKEN is not set; every update will be rejected");
    }
    let dispatcher = Arc::new(Dispatcher::from_config(&config)?);

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(config, dispatcher, port).await,
        Command::Invoke { envelope } => invoke(&dispatcher, &envelope).await,
    }
}

async fn serve(config: Config, dispatcher: Arc<Dispatcher>, port: Option<u16>) -> anyhow::Result<()> {
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

    let app = create_router(AppState { dispatcher, config });

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn invoke(dispatcher: &Dispatcher, path: &PathBuf) -> anyhow::Result<()> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        tokio::fs::read(path).await?
    };

    // A file that is not a JSON envelope is taken as the request body itself.
    let envelope = match serde_json::from_slice::<serde_json::Value>(&raw) {
        Ok(value @ serde_json::Value::Object(_)) => Envelope::from_json(value),
        _ => Envelope::from_body_bytes(raw),
    };

    let response = dispatcher.dispatch(&envelope).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
