//! # shopping-cart
//!
//! Hosts the [`ShoppingCart`] app callback service so a Dapr sidecar can invoke it, deliver
//! `TopicA` events and `storage` binding events to it.
//!
//! ```bash
//! dapr run --app-id shoppingCart --app-protocol grpc --app-port 4001 -- shopping-cart
//! ```
use anyhow::Context;
use clap::Parser;
use daprdemo_core::{
    callback::ShoppingCart, dapr_proto::AppCallbackServer, tonic::transport::Server,
};
use std::net::{Ipv4Addr, SocketAddr};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "shopping-cart",
    version,
    about = "Dapr app callback service for a shopping cart"
)]
struct Args {
    /// Port the callback service listens on (the sidecar's --app-port)
    #[arg(short, long, default_value_t = 4001)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port));

    info!(%addr, "shopping cart starting");

    Server::builder()
        .add_service(AppCallbackServer::new(ShoppingCart::default()))
        .serve_with_shutdown(addr, async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await
        .with_context(|| format!("Failed to serve on {addr}"))?;

    Ok(())
}
