use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderValue, CONTENT_TYPE};

use csp_guard::config::load_config;
use csp_guard::policy::{Policy, HEADER_POLICY, HEADER_REPORT_ONLY, REPORT_CONTENT_TYPE};
use csp_guard::report::ReportEnvelope;

#[derive(Parser)]
#[command(name = "csp-cli")]
#[command(about = "Encode, decode and submit Content-Security-Policy data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the policy header (baseline policy unless a config is given)
    Encode {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Decode policy header text into JSON
    Decode {
        /// Header value, e.g. "default-src 'self'; img-src *"
        policy: String,
    },
    /// Submit a violation report to a collector
    Send {
        #[arg(short, long, default_value = "http://localhost:8080/csp-report")]
        url: String,

        /// JSON file holding a {"csp-report": {...}} envelope
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { config } => {
            let policy = match config {
                Some(path) => load_config(&path)?.policy,
                None => Policy::baseline(),
            };
            let header = if policy.report_only { HEADER_REPORT_ONLY } else { HEADER_POLICY };
            println!("{}: {}", header, policy.encode()?);
        }
        Commands::Decode { policy } => {
            let policy = Policy::decode(&policy);
            println!("{}", serde_json::to_string_pretty(&policy)?);
        }
        Commands::Send { url, file } => {
            let body = std::fs::read(&file)?;
            // Refuse to send what the collector would reject anyway.
            serde_json::from_slice::<ReportEnvelope>(&body)?;

            let res = reqwest::Client::new()
                .post(&url)
                .header(CONTENT_TYPE, HeaderValue::from_static(REPORT_CONTENT_TYPE))
                .body(body)
                .send()
                .await?;

            let status = res.status();
            if status.is_success() {
                println!("Report accepted ({})", status);
            } else {
                eprintln!("Error: collector returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
            }
        }
    }

    Ok(())
}
