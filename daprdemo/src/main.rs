//! # daprdemo
//!
//! Talks to an application through its Dapr sidecar:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`].
//! 2. **Connection**: Opens a plaintext gRPC channel to the sidecar on `localhost`.
//! 3. **Invocation**: Sends every positional message to `OrderService/say` and prints the answers.
//! 4. **Publication**: Publishes a stock reduction on `Storage.Reduce`.
//! 5. **Shutdown**: Closes the channel, giving in-flight calls a grace period, and reports
//!    calls that had to be aborted.
//!
//! Call failures are reported and the run carries on; only a failed connection stops it.
mod cli;
mod formatter;

use clap::Parser;
use cli::Cli;
use daprdemo_core::{SidecarClient, SidecarConfig, caller, client::Shutdown};
use formatter::{FormattedString, GenericError};
use std::process;
use tracing_subscriber::EnvFilter;

const DEMO_PRODUCT_ID: &str = "095d1f49-41c8-4716-81f0-35e05303faea";
const DEMO_AMOUNT: i32 = 3;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Cli::parse();
    let config = SidecarConfig::new(args.port);

    let mut client = match SidecarClient::connect(&config).await {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    if !args.messages.is_empty() {
        for (message, result) in args
            .messages
            .iter()
            .zip(caller::send_messages(&client, &args.messages).await)
        {
            match result {
                Ok(response) => println!("{}", FormattedString::from(response)),
                Err(err) => eprintln!("'{message}': {}", FormattedString::from(err)),
            }
        }
    }

    match caller::publish_stock_reduction(&client, DEMO_PRODUCT_ID, DEMO_AMOUNT).await {
        Ok(()) => println!("Published message!"),
        Err(err) => eprintln!("{}", FormattedString::from(err)),
    }

    if let Some(report) = shutdown_report(client.shutdown().await) {
        eprintln!("{report}");
    }
    println!("Client: Bye.");
}

fn shutdown_report(outcome: Shutdown) -> Option<FormattedString> {
    match outcome {
        Shutdown::Forced => Some(FormattedString::from(GenericError(
            "Shutdown Forced",
            "in-flight sidecar calls were aborted after the grace period",
        ))),
        Shutdown::Graceful | Shutdown::AlreadyClosed => None,
    }
}
