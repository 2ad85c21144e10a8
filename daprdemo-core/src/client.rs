//! # Sidecar Client
//!
//! [`SidecarClient`] is the facade over the generated `dapr.Dapr` stub. It exposes the two
//! sidecar RPCs the demos use:
//!
//! * [`SidecarClient::invoke_service`]: routes an [`InvokeEnvelope`] to another app.
//! * [`SidecarClient::publish_event`]: publishes a [`PublishEnvelope`] on a topic.
//!
//! Both return a future that owns a clone of the underlying channel, so a caller may issue
//! several calls and await them later. Each outstanding future counts as an in-flight call
//! until it completes or is dropped.
//!
//! ## Shutdown
//!
//! [`SidecarClient::shutdown`] refuses new calls, then waits up to the configured grace
//! period for the in-flight ones. Whatever is still running after that fails with
//! [`SidecarError::Aborted`].
//!
//! ```rust,no_run
//! use daprdemo_core::{SidecarClient, SidecarConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = SidecarClient::connect(&SidecarConfig::new(50001)).await?;
//! // ... issue calls ...
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```
use crate::{
    BoxError, SidecarConfig,
    envelope::{InvokeEnvelope, InvokeResponse, PublishEnvelope},
};
use dapr_proto::{
    SidecarGrpcClient,
    pb::dapr::{InvokeServiceEnvelope, PublishEventEnvelope},
};
use http_body::Body as HttpBody;
use std::{future::Future, time::Duration};
use tokio::sync::{mpsc, watch};
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info, warn};

/// Errors that can occur when connecting to the sidecar.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, #[source] tonic::transport::Error),
    #[error("Failed to connect to '{0}': {1}")]
    ConnectionFailed(String, #[source] tonic::transport::Error),
}

/// Errors surfaced by the futures returned from [`SidecarClient`] calls.
#[derive(Debug, thiserror::Error)]
pub enum SidecarError {
    #[error("The sidecar client is shut down")]
    Closed,
    #[error("The call was aborted because the client shut down before the sidecar answered")]
    Aborted,
    #[error("Sidecar call failed: '{0}'")]
    Rpc(#[from] tonic::Status),
}

/// How a call to [`SidecarClient::shutdown`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Every in-flight call finished within the grace period.
    Graceful,
    /// The grace period elapsed and the remaining calls were aborted.
    Forced,
    /// The client had already been shut down; nothing happened.
    AlreadyClosed,
}

#[derive(Debug)]
struct Open<S> {
    grpc: SidecarGrpcClient<S>,
    // Never sent on. Every in-flight call holds a clone; the channel reports closed once the
    // last one is dropped.
    in_flight: mpsc::Sender<()>,
}

/// Everything a single call needs, detached from the client.
struct Call<S> {
    grpc: SidecarGrpcClient<S>,
    in_flight: mpsc::Sender<()>,
    abort: watch::Receiver<bool>,
}

/// Client facade for the Dapr sidecar API.
#[derive(Debug)]
pub struct SidecarClient<S = Channel> {
    open: Option<Open<S>>,
    drained: mpsc::Receiver<()>,
    abort: watch::Sender<bool>,
    grace_period: Duration,
}

impl SidecarClient<Channel> {
    /// Opens a plaintext gRPC channel to the sidecar described by `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(SidecarClient)` - The connected client.
    /// * `Err(ConnectError)` - If the URL is invalid or the connection fails.
    pub async fn connect(config: &SidecarConfig) -> Result<Self, ConnectError> {
        let url = config.endpoint_url();

        let endpoint = Endpoint::new(url.clone())
            .map_err(|e| ConnectError::InvalidUrl(url.clone(), e))?
            .connect_timeout(config.connect_timeout);

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ConnectError::ConnectionFailed(url.clone(), e))?;

        info!(%url, "connected to sidecar");

        Ok(Self::from_service(channel, config.grace_period))
    }
}

impl<S> SidecarClient<S>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Creates a client from an existing Tonic service/channel.
    pub fn from_service(service: S, grace_period: Duration) -> Self {
        let (in_flight, drained) = mpsc::channel(1);
        let (abort, _) = watch::channel(false);

        Self {
            open: Some(Open {
                grpc: SidecarGrpcClient::new(service),
                in_flight,
            }),
            drained,
            abort,
            grace_period,
        }
    }

    /// Sends `envelope` through the sidecar's `InvokeService` RPC.
    ///
    /// The returned future resolves to the response envelope. Its payload is type-erased;
    /// read it with [`InvokeResponse::parse_as`].
    pub fn invoke_service(
        &self,
        envelope: InvokeEnvelope,
    ) -> impl Future<Output = Result<InvokeResponse, SidecarError>> + use<S> {
        let call = self.begin();

        async move {
            let Call {
                mut grpc,
                in_flight: _in_flight,
                mut abort,
            } = call?;

            debug!(id = %envelope.id, method = %envelope.method, "invoking service");
            let request = InvokeServiceEnvelope::from(envelope);

            let response = tokio::select! {
                response = grpc.invoke_service(request) => response?,
                Ok(_) = abort.wait_for(|aborted| *aborted) => return Err(SidecarError::Aborted),
            };

            Ok(InvokeResponse::from(response.into_inner()))
        }
    }

    /// Sends `envelope` through the sidecar's `PublishEvent` RPC.
    ///
    /// Nothing comes back but an acknowledgement, yet the future must still be awaited to
    /// find out whether the sidecar accepted the event.
    pub fn publish_event(
        &self,
        envelope: PublishEnvelope,
    ) -> impl Future<Output = Result<(), SidecarError>> + use<S> {
        let call = self.begin();

        async move {
            let Call {
                mut grpc,
                in_flight: _in_flight,
                mut abort,
            } = call?;

            debug!(topic = %envelope.topic, "publishing event");
            let request = PublishEventEnvelope::from(envelope);

            tokio::select! {
                response = grpc.publish_event(request) => response?,
                Ok(_) = abort.wait_for(|aborted| *aborted) => return Err(SidecarError::Aborted),
            };

            Ok(())
        }
    }

    fn begin(&self) -> Result<Call<S>, SidecarError> {
        let open = self.open.as_ref().ok_or(SidecarError::Closed)?;

        Ok(Call {
            grpc: open.grpc.clone(),
            in_flight: open.in_flight.clone(),
            abort: self.abort.subscribe(),
        })
    }
}

impl<S> SidecarClient<S> {
    pub fn is_closed(&self) -> bool {
        self.open.is_none()
    }

    /// Closes the client.
    ///
    /// New calls fail with [`SidecarError::Closed`] from here on. Calls already issued get
    /// the grace period to finish; the rest are aborted. Calling this again is a no-op that
    /// returns [`Shutdown::AlreadyClosed`].
    pub async fn shutdown(&mut self) -> Shutdown {
        let Some(open) = self.open.take() else {
            debug!("sidecar client already shut down");
            return Shutdown::AlreadyClosed;
        };
        drop(open);

        match tokio::time::timeout(self.grace_period, self.drained.recv()).await {
            Ok(_) => {
                info!("sidecar client shut down");
                Shutdown::Graceful
            }
            Err(_) => {
                warn!(
                    grace_period = ?self.grace_period,
                    "in-flight sidecar calls did not finish in time, aborting them"
                );
                self.abort.send_replace(true);
                Shutdown::Forced
            }
        }
    }
}
