mod client;
mod seed;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use cookbook_core::{decompose_mass, decompose_volume, format_mass, format_volume};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "cookbook")]
#[command(about = "Go Cookbook CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Quantity {
    /// Milliliters
    Volume,
    /// Grams
    Mass,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the server (unauthenticated)
    Ping {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Seed the database with a user, ingredients and sample recipes
    Seed {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Username for the seed user
        #[arg(long)]
        username: String,
        /// Password for the seed user
        #[arg(long)]
        password: String,
    },
    /// Show how an amount is displayed in metric or imperial units
    Convert {
        #[arg(value_enum)]
        quantity: Quantity,
        /// Amount in milliliters or grams
        amount: f64,
        /// Show US customary units instead of metric
        #[arg(long)]
        imperial: bool,
    },
}

#[derive(Deserialize)]
struct PingResponse {
    message: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ping { server } => {
            ping(&server).await?;
        }
        Commands::Seed {
            server,
            username,
            password,
        } => {
            seed::seed(&server, &username, &password).await?;
        }
        Commands::Convert {
            quantity,
            amount,
            imperial,
        } => {
            println!("{}", convert(quantity, amount, imperial)?);
        }
    }

    Ok(())
}

async fn ping(server: &str) -> Result<()> {
    let client = client::ApiClient::new(server);
    let response: PingResponse = client.get("/api/test/unauthed-ping").await?;

    println!("{}", response.message);

    Ok(())
}

fn convert(quantity: Quantity, amount: f64, imperial: bool) -> Result<String> {
    let display = match quantity {
        Quantity::Volume => {
            let text = format_volume(!imperial, amount)?;
            if imperial {
                tracing::debug!(breakdown = ?decompose_volume(amount)?, "Volume breakdown");
            }
            text
        }
        Quantity::Mass => {
            let text = format_mass(!imperial, amount)?;
            if imperial {
                tracing::debug!(breakdown = ?decompose_mass(amount)?, "Mass breakdown");
            }
            text
        }
    };
    Ok(display)
}
