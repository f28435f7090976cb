//! Credit checker.
//!
//! Sends a tiny query every 30 seconds until the API answers, giving up
//! after ten attempts. Useful right after topping up an xAI account, when
//! requests fail until the credits land.

use anyhow::Result;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

use grok_client::logging::init_logging;
use grok_client::{ClientConfig, GrokClient};

const CONFIG_PATH: &str = "grok.toml";
const CHECK_MODEL: &str = "grok-2-latest";
const CHECK_PROMPT: &str = "Hi";
const MAX_ATTEMPTS: u32 = 10;
const RETRY_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenv::dotenv();
    init_logging();

    println!("Checking Grok API Credits...");
    println!("{}", "=".repeat(40));

    let client = GrokClient::from_config(ClientConfig::load_or_resolve(CONFIG_PATH, None)?)?;

    for attempt in 1..=MAX_ATTEMPTS {
        println!("\nAttempt {attempt}/{MAX_ATTEMPTS}");

        match client.simple_query(CHECK_PROMPT, Some(CHECK_MODEL)).await {
            Ok(response) => {
                info!(attempt, "Credits available");
                println!("SUCCESS! Credits are now available!");
                println!("Response: {response}");
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => {
                warn!(attempt, error = %e, retryable = e.is_retryable(), "Credit check failed");
                println!("Still waiting... Error: {e}");
            }
        }

        if attempt < MAX_ATTEMPTS {
            println!("Waiting {} seconds before next check...", RETRY_INTERVAL.as_secs());
            tokio::time::sleep(RETRY_INTERVAL).await;
        }
    }

    println!("\nMaximum attempts reached.");
    println!("Please check your xAI console manually:");
    println!("https://console.x.ai/");
    Ok(ExitCode::FAILURE)
}
