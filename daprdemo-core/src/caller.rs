//! # Caller
//!
//! The call sequences driven by the demo binaries: saying hello to the order service,
//! announcing a stock reduction to whoever subscribes to `Storage.Reduce`, and placing an
//! order that reduces the stock only once the order service accepted it.
use crate::{
    BoxError, SidecarClient,
    client::SidecarError,
    envelope::{EnvelopeError, InvokeEnvelope, PublishEnvelope},
};
use dapr_proto::pb::daprexamples::{
    CreateOrderRequest, CreateOrderResponse, SayRequest, SayResponse, StorageReduceData,
};
use futures_util::future::join_all;
use http_body::Body as HttpBody;
use prost::Name;
use std::future::Future;
use tracing::info;

/// App id of the service greeted by [`say`].
pub const ORDER_SERVICE: &str = "OrderService";
/// Method invoked on [`ORDER_SERVICE`].
pub const SAY_METHOD: &str = "say";
/// Method placing an order on [`ORDER_SERVICE`].
pub const CREATE_ORDER_METHOD: &str = "createOrder";
/// Topic stock reductions are published on.
pub const STOCK_REDUCTION_TOPIC: &str = "Storage.Reduce";

#[derive(Debug, thiserror::Error)]
pub enum CallerError {
    #[error("Invalid envelope: '{0}'")]
    Envelope(#[from] EnvelopeError),
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
    #[error("Failed to decode '{0}' from the response payload: '{1}'")]
    Decode(String, #[source] prost::DecodeError),
}

/// What came of [`create_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The order service accepted the order and the stock reduction was published.
    Placed,
    /// The order service refused the order; nothing was published.
    Rejected,
}

/// Invokes `say` on the order service with `message`.
///
/// The call is issued against `client` right away; the returned future does not borrow it.
pub fn say<S>(
    client: &SidecarClient<S>,
    message: &str,
) -> impl Future<Output = Result<SayResponse, CallerError>> + use<S>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    let request = SayRequest {
        message: message.to_string(),
    };
    let call = InvokeEnvelope::new(ORDER_SERVICE, SAY_METHOD, &request)
        .map(|envelope| client.invoke_service(envelope));

    async move {
        let response = call?.await?;

        response
            .parse_as::<SayResponse>()
            .map_err(|e| CallerError::Decode(SayResponse::full_name(), e))
    }
}

/// Issues one [`say`] per message, then waits for all of them.
///
/// Results come back in the order of `messages`. A failed message does not stop the others.
pub async fn send_messages<S>(
    client: &SidecarClient<S>,
    messages: &[String],
) -> Vec<Result<SayResponse, CallerError>>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    let pending = messages.iter().map(|message| {
        info!(%message, "sending");
        say(client, message)
    });

    join_all(pending).await
}

/// Publishes a [`StorageReduceData`] event on [`STOCK_REDUCTION_TOPIC`].
pub async fn publish_stock_reduction<S>(
    client: &SidecarClient<S>,
    product_id: &str,
    amount: i32,
) -> Result<(), CallerError>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    let event = StorageReduceData {
        product_id: product_id.to_string(),
        amount,
    };
    let envelope = PublishEnvelope::new(STOCK_REDUCTION_TOPIC, &event)?;

    client.publish_event(envelope).await?;
    info!(%product_id, amount, "published stock reduction");

    Ok(())
}

/// Places `order` with the order service, then publishes the matching stock reduction.
///
/// The reduction carries the order's product and amount and is only published when the
/// `CreateOrderResponse` reports success.
pub async fn create_order<S>(
    client: &SidecarClient<S>,
    order: &CreateOrderRequest,
) -> Result<OrderOutcome, CallerError>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    let envelope = InvokeEnvelope::new(ORDER_SERVICE, CREATE_ORDER_METHOD, order)?;
    let response = client
        .invoke_service(envelope)
        .await?
        .parse_as::<CreateOrderResponse>()
        .map_err(|e| CallerError::Decode(CreateOrderResponse::full_name(), e))?;

    if !response.succeed {
        info!(
            product_id = %order.product_id,
            customer_id = %order.customer_id,
            "order rejected"
        );
        return Ok(OrderOutcome::Rejected);
    }

    publish_stock_reduction(client, &order.product_id, order.amount).await?;

    Ok(OrderOutcome::Placed)
}
