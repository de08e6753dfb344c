use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use iris_serving::model::{IrisBatch, IrisFeatures};

#[derive(Parser)]
#[command(name = "iris-cli")]
#[command(about = "Client for the Iris prediction service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// Show model and circuit breaker status
    Status,
    /// Predict the species of a single flower
    Predict {
        #[arg(long)]
        sepal_length: f64,
        #[arg(long)]
        sepal_width: f64,
        #[arg(long)]
        petal_length: f64,
        #[arg(long)]
        petal_width: f64,
    },
    /// Predict a batch read from a JSON file (`{"features": [...]}`)
    Batch {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_json(res).await?;
        }
        Commands::Status => {
            let res = client.get(format!("{}/status", cli.url)).send().await?;
            print_json(res).await?;
        }
        Commands::Predict {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        } => {
            let features = IrisFeatures {
                sepal_length,
                sepal_width,
                petal_length,
                petal_width,
            };
            let res = client
                .post(format!("{}/predict_single", cli.url))
                .json(&features)
                .send()
                .await?;
            print_text(res).await?;
        }
        Commands::Batch { file } => {
            let content = std::fs::read_to_string(&file)?;
            let batch: IrisBatch = serde_json::from_str(&content)?;
            let res = client
                .post(format!("{}/predict_batch", cli.url))
                .json(&batch)
                .send()
                .await?;
            print_json(res).await?;
        }
    }

    Ok(())
}

/// Pass successful responses through; report anything else on stderr.
async fn check_status(res: reqwest::Response) -> Result<Option<reqwest::Response>, reqwest::Error> {
    let status = res.status();
    if status.is_success() {
        return Ok(Some(res));
    }

    eprintln!("Error: service returned status {}", status);
    let text = res.text().await?;
    if !text.is_empty() {
        eprintln!("Response: {}", text);
    }
    Ok(None)
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(res) = check_status(res).await? {
        let json: Value = res.json().await?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

async fn print_text(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(res) = check_status(res).await? {
        println!("{}", res.text().await?);
    }
    Ok(())
}
