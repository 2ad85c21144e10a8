//! # App Callback: Shopping Cart
//!
//! Dapr delivers invocations, events and subscription requests to an app through the
//! `daprclient.DaprClient` service the app hosts. [`ShoppingCart`] is such an app: it keeps
//! the product ids added to the cart and answers with the cart's content.
//!
//! Supported methods on `OnInvoke`:
//!
//! * `AddProduct`: expects an `AddProductRequest`, replies with an `AddProductResponse`.
//! * `GetShoppingCart`: replies with a `GetShoppingCartResponse` listing every product id.
//!
//! Any other method gets an empty `Any` back.
use crate::envelope::Payload;
use dapr_proto::{
    AppCallback,
    pb::{
        daprclient::{
            BindingEventEnvelope, BindingResponseEnvelope, CloudEventEnvelope,
            GetBindingsSubscriptionsEnvelope, GetTopicSubscriptionsEnvelope, InvokeEnvelope,
        },
        daprexamples::{AddProductRequest, AddProductResponse, GetShoppingCartResponse},
    },
};
use prost_types::Any;
use tokio::sync::Mutex;
use tonic::{Request, Response, Status};
use tracing::{debug, info};

pub const ADD_PRODUCT_METHOD: &str = "AddProduct";
pub const GET_SHOPPING_CART_METHOD: &str = "GetShoppingCart";

/// Topics the app asks Dapr to deliver through `OnTopicEvent`.
pub const SUBSCRIBED_TOPICS: &[&str] = &["TopicA"];
/// Input bindings the app asks Dapr to deliver through `OnBindingEvent`.
pub const SUBSCRIBED_BINDINGS: &[&str] = &["storage"];

#[derive(Debug, Default)]
pub struct ShoppingCart {
    product_ids: Mutex<Vec<String>>,
}

impl ShoppingCart {
    pub async fn add_product(&self, request: AddProductRequest) -> AddProductResponse {
        self.product_ids.lock().await.push(request.product_id);
        AddProductResponse { succeed: true }
    }

    pub async fn shopping_cart(&self) -> GetShoppingCartResponse {
        GetShoppingCartResponse {
            product_id: self.product_ids.lock().await.clone(),
        }
    }
}

#[tonic::async_trait]
impl AppCallback for ShoppingCart {
    async fn on_invoke(&self, request: Request<InvokeEnvelope>) -> Result<Response<Any>, Status> {
        let envelope = request.into_inner();
        let data = envelope.data.map(Payload::from).unwrap_or_default();

        info!(method = %envelope.method, bytes = data.value().len(), "invoked");

        let reply = match envelope.method.as_str() {
            ADD_PRODUCT_METHOD => {
                let request = data.parse_as::<AddProductRequest>().map_err(|e| {
                    Status::invalid_argument(format!("Malformed AddProductRequest: {e}"))
                })?;
                Payload::pack(&self.add_product(request).await)
            }
            GET_SHOPPING_CART_METHOD => Payload::pack(&self.shopping_cart().await),
            other => {
                debug!(method = %other, "unknown method, replying with an empty payload");
                Payload::default()
            }
        };

        Ok(Response::new(reply.into()))
    }

    async fn get_topic_subscriptions(
        &self,
        _request: Request<()>,
    ) -> Result<Response<GetTopicSubscriptionsEnvelope>, Status> {
        Ok(Response::new(GetTopicSubscriptionsEnvelope {
            topics: SUBSCRIBED_TOPICS.iter().map(|t| t.to_string()).collect(),
        }))
    }

    async fn get_bindings_subscriptions(
        &self,
        _request: Request<()>,
    ) -> Result<Response<GetBindingsSubscriptionsEnvelope>, Status> {
        Ok(Response::new(GetBindingsSubscriptionsEnvelope {
            bindings: SUBSCRIBED_BINDINGS.iter().map(|b| b.to_string()).collect(),
        }))
    }

    async fn on_binding_event(
        &self,
        request: Request<BindingEventEnvelope>,
    ) -> Result<Response<BindingResponseEnvelope>, Status> {
        info!(binding = %request.get_ref().name, "binding event received");
        Ok(Response::new(BindingResponseEnvelope::default()))
    }

    async fn on_topic_event(
        &self,
        request: Request<CloudEventEnvelope>,
    ) -> Result<Response<()>, Status> {
        let event = request.get_ref();
        info!(topic = %event.topic, id = %event.id, "topic event received");
        Ok(Response::new(()))
    }
}
