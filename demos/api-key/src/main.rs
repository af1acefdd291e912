//! API key demo
//!
//! Fetches an endpoint with an API key sent as a bearer token and prints the
//! response body. Set `RUST_LOG=debug` to see each stage of the call.

// Example-specific lint allowances
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use std::process::ExitCode;
use std::time::Duration;

use courier::prelude::*;
use tracing_subscriber::EnvFilter;

const API_KEY: &str = "your-api-key-here";
const API_ENDPOINT: &str = "https://your-api-endpoint.com";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::builder(HyperTransport::new())
        .with_api_key(API_KEY)
        .with_logging()
        .build();

    let ctx = Context::background().with_timeout(Duration::from_secs(30));

    match client.get(&ctx, API_ENDPOINT).await {
        Ok(body) => {
            println!("{}", String::from_utf8_lossy(&body));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
