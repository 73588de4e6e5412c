use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "explorer-cli")]
#[command(about = "Query a running explorer gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway liveness
    Health,
    /// Fetch a block with up to ten of its transactions
    Block {
        /// btc, ltc or doge
        network: String,
        /// Block height; the latest block when neither height nor hash is given
        #[arg(long, conflicts_with = "hash")]
        height: Option<u64>,
        /// Block hash (64 hex characters)
        #[arg(long)]
        hash: Option<String>,
    },
    /// Fetch a single transaction
    Tx {
        /// btc, ltc or doge
        network: String,
        /// Transaction hash (64 hex characters)
        txid: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)),
        Commands::Block {
            network,
            height,
            hash,
        } => {
            let mut query = Vec::new();
            if let Some(height) = height {
                query.push(("height", height.to_string()));
            }
            if let Some(hash) = hash {
                query.push(("blockhash", hash));
            }
            client
                .get(format!("{}/network/{}", base, network))
                .query(&query)
        }
        Commands::Tx { network, txid } => {
            client.get(format!("{}/network/{}/tx/{}", base, network, txid))
        }
    };

    let res = request.send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
