use clap::Parser;
use log::info;
use server::network::GameServer;
use server::session::SessionConfig;

/// Main-method of the application.
/// Parses command-line arguments, binds the listener, and runs game
/// sessions until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "5000")]
        port: u16,
        /// Number of players required to start a session
        #[clap(short = 'n', long, default_value = "2")]
        players: u32,
        /// Lowest value the secret number can take
        #[clap(long, default_value = "0")]
        low: i64,
        /// Highest value the secret number can take (inclusive)
        #[clap(long, default_value = "100")]
        high: i64,
    }

    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    if args.players < 2 {
        return Err("a game needs at least 2 players".into());
    }
    if args.low > args.high {
        return Err("the secret range is empty".into());
    }

    let config = SessionConfig {
        players: args.players,
        low: args.low,
        high: args.high,
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = GameServer::bind(&address, config).await?;

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c, shutting down");
        }
    }

    Ok(())
}
