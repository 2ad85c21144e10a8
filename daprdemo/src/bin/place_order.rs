//! # place-order
//!
//! Places an order with `OrderService` through the Dapr sidecar. When the order service
//! accepts it, the ordered amount is published as a stock reduction on `Storage.Reduce`.
//!
//! ```bash
//! dapr run --app-id placeOrder --dapr-grpc-port 50001 -- place-order -p 50001
//! ```
use anyhow::Context;
use clap::Parser;
use daprdemo_core::{
    SidecarClient, SidecarConfig,
    caller::{self, OrderOutcome},
    client::Shutdown,
    dapr_proto::pb::daprexamples::CreateOrderRequest,
};
use tracing_subscriber::EnvFilter;

const DEMO_PRODUCT_ID: &str = "095d1f49-41c8-4716-81f0-35e05303faea";
const DEMO_CUSTOMER_ID: &str = "0d158a88-73de-42e5-87c7-fdbc00bdc5f9";
const DEMO_AMOUNT: i32 = 20;

#[derive(Parser, Debug)]
#[command(
    name = "place-order",
    version,
    about = "Place an order and reduce the stock through a Dapr sidecar"
)]
struct Args {
    /// gRPC port of the Dapr sidecar (e.g. 50001)
    #[arg(short, long)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut client = SidecarClient::connect(&SidecarConfig::new(args.port))
        .await
        .context("Failed to reach the Dapr sidecar")?;

    let order = CreateOrderRequest {
        product_id: DEMO_PRODUCT_ID.to_string(),
        amount: DEMO_AMOUNT,
        customer_id: DEMO_CUSTOMER_ID.to_string(),
    };

    let outcome = caller::create_order(&client, &order).await;

    if client.shutdown().await == Shutdown::Forced {
        eprintln!("Shutdown forced: in-flight sidecar calls were aborted after the grace period");
    }

    match outcome.context("Failed to place the order")? {
        OrderOutcome::Placed => println!("Order placed, published stock reduction!"),
        OrderOutcome::Rejected => println!("Order rejected, stock left untouched."),
    }

    Ok(())
}
