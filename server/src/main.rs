use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tracing::{error, info};

use drawboard_server::{serve, AppState, ServerError, DEFAULT_ROOM};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    /// Room every connection joins.
    #[arg(long, default_value = DEFAULT_ROOM)]
    room: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drawboard_server=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(error) = run(args).await {
        error!(%error, "relay server failed");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, room = %args.room, "drawing relay listening");
    serve(listener, AppState::new(args.room)).await
}
