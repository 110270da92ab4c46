use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vex_core::{config, ChainId};
use vex_fetch::App;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch token decimals
    Token {
        address: String,
        /// Chain id
        #[arg(long, default_value_t = 74)]
        chain: u64,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Fetch reserves and swap fee of the pair for two tokens
    Pair {
        token_a: String,
        token_b: String,
        /// Chain id
        #[arg(long, default_value_t = 74)]
        chain: u64,
    },
    /// Write a config template to config/default.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let Cli {
        config: config_path,
        verbose,
        command,
    } = Cli::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let output = match command {
        Command::Init => {
            config::ensure_default_config()?;
            info!("Config template written to config/default.toml");
            return Ok(());
        }
        Command::Token {
            address,
            chain,
            symbol,
            name,
        } => {
            let chain_id = ChainId::try_from(chain)?;
            let app = load_app(&config_path)?;
            info!("Fetching token {} on {}", address, chain_id);
            serde_json::to_string_pretty(&app.token(chain_id, &address, symbol, name).await?)?
        }
        Command::Pair {
            token_a,
            token_b,
            chain,
        } => {
            let chain_id = ChainId::try_from(chain)?;
            let app = load_app(&config_path)?;
            info!("Fetching pair {} / {} on {}", token_a, token_b, chain_id);
            serde_json::to_string_pretty(&app.pair(chain_id, &token_a, &token_b).await?)?
        }
    };
    println!("{output}");

    Ok(())
}

fn load_app(config_path: &str) -> Result<App> {
    let config = config::load_config(config_path)?;
    App::from_config(&config)
}
