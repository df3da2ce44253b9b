use clap::Parser;
use client::network::GameClient;
use client::strategy::GuessSource;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:5000")]
    server: String,

    /// Type guesses by hand instead of using the automatic guesser
    #[arg(short, long)]
    manual: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);

    let source = if args.manual {
        GuessSource::manual()
    } else {
        GuessSource::auto()
    };

    GameClient::new(&args.server, source).run().await?;

    Ok(())
}
