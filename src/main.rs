//! Grok demo.
//!
//! Resolves the API key (argument-free: `.env`, `XAI_API_KEY` or the
//! variable named in `grok.toml`), runs two canned examples and then drops
//! into an interactive loop on stdin.

use anyhow::{Context, Result};
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{error, info};

use grok_client::logging::init_logging;
use grok_client::repl;
use grok_client::{ClientConfig, GrokClient, GrokError, Message};

const CONFIG_PATH: &str = "grok.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    println!("Grok LLM API Client Demo");
    println!("{}", "=".repeat(40));

    let client = match ClientConfig::load_or_resolve(CONFIG_PATH, None).and_then(GrokClient::from_config) {
        Ok(client) => client,
        // Only a missing key gets setup instructions; a broken grok.toml
        // falls through to the plain error below.
        Err(GrokError::MissingApiKey { env_var }) => {
            println!("Configuration Error: no API key found.");
            print_key_help(&env_var);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        endpoint = %client.config().endpoint(),
        model = %client.config().defaults.model,
        "Client ready"
    );

    match run_demo(&client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Demo aborted");
            println!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_demo(client: &GrokClient) -> Result<()> {
    println!("Available models: {}", client.available_models().join(", "));
    println!();

    // -- Example 1 ---------------------------------------------------------

    println!("Example 1: Simple Query");
    println!("{}", "-".repeat(20));
    let query = "What is artificial intelligence and how does it work?";
    println!("Query: {query}");

    let response = client
        .simple_query(query, None)
        .await
        .context("Simple query failed")?;
    println!("Response: {response}");
    println!();

    // -- Example 2 ---------------------------------------------------------

    println!("Example 2: Conversational Chat");
    println!("{}", "-".repeat(30));

    let conversation = vec![
        Message::system("You are a helpful AI assistant specializing in technology."),
        Message::user("Tell me about machine learning."),
        Message::assistant(
            "Machine learning is a subset of artificial intelligence that enables computers \
             to learn and make decisions from data without being explicitly programmed for \
             every task.",
        ),
    ];
    let new_message = "What are the main types of machine learning?";
    println!("New message: {new_message}");

    let response = client
        .conversational_chat(&conversation, new_message, None)
        .await
        .context("Conversational chat failed")?;
    println!("Response: {response}");
    println!();

    // -- Example 3 ---------------------------------------------------------

    println!("Example 3: Interactive Mode");
    println!("{}", "-".repeat(25));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let answered = repl::run_interactive(client, stdin, &mut stdout)
        .await
        .context("Interactive session failed")?;
    info!(answered, "Interactive session ended");

    Ok(())
}

fn print_key_help(env_var: &str) {
    println!();
    println!("To fix this:");
    println!("1. Get an API key from https://console.x.ai/");
    println!("2. Set the {env_var} environment variable:");
    println!("   export {env_var}='your_api_key_here'");
    println!("   (On Windows: set {env_var}=your_api_key_here)");
}
