use daprdemo_core::SidecarClient;
use daprdemo_core::caller::{
    self, CREATE_ORDER_METHOD, CallerError, ORDER_SERVICE, OrderOutcome, SAY_METHOD,
    STOCK_REDUCTION_TOPIC,
};
use daprdemo_core::client::SidecarError;
use daprdemo_core::dapr_proto::DaprServer;
use daprdemo_core::dapr_proto::pb::daprexamples::{
    CreateOrderRequest, SayRequest, StorageReduceData,
};
use daprdemo_core::envelope::Payload;
use fake_sidecar::{FakeSidecar, SAY_TIMESTAMP_SECONDS};
use std::time::Duration;
use tonic::Status;


fn client_for(sidecar: FakeSidecar) -> SidecarClient<DaprServer<FakeSidecar>> {
    SidecarClient::from_service(DaprServer::new(sidecar), Duration::from_secs(1))
}

#[tokio::test]
async fn test_say_parses_the_response_by_type() {
    let sidecar = FakeSidecar::default();
    let client = client_for(sidecar.clone());

    let response = caller::say(&client, "hello").await.unwrap();

    let timestamp = response.timestamp.unwrap();
    assert_eq!(timestamp.seconds, SAY_TIMESTAMP_SECONDS);
    assert_eq!(timestamp.nanos, "hello".len() as i32);

    let invoked = sidecar.invoked.lock().unwrap();
    assert_eq!(invoked.len(), 1);
    assert_eq!(invoked[0].id, ORDER_SERVICE);
    assert_eq!(invoked[0].method, SAY_METHOD);

    let request = Payload::from(invoked[0].data.clone().unwrap())
        .parse_as::<SayRequest>()
        .unwrap();
    assert_eq!(request.message, "hello");
}

#[tokio::test]
async fn test_send_messages_keeps_message_order() {
    let sidecar = FakeSidecar::default();
    let client = client_for(sidecar.clone());

    let messages = vec!["message one".to_string(), "two".to_string()];
    let responses = caller::send_messages(&client, &messages).await;

    let nanos: Vec<_> = responses
        .into_iter()
        .map(|r| r.unwrap().timestamp.unwrap().nanos)
        .collect();
    assert_eq!(nanos, vec![11, 3]);
    assert_eq!(sidecar.invoked.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_send_messages_reports_each_failure() {
    let client = client_for(FakeSidecar::failing(Status::internal("boom")));

    let messages = vec!["a".to_string(), "b".to_string()];
    let responses = caller::send_messages(&client, &messages).await;

    assert_eq!(responses.len(), 2);
    assert!(
        responses
            .iter()
            .all(|r| matches!(r, Err(CallerError::Sidecar(SidecarError::Rpc(_)))))
    );
}

#[tokio::test]
async fn test_publish_stock_reduction() {
    let sidecar = FakeSidecar::default();
    let client = client_for(sidecar.clone());

    caller::publish_stock_reduction(&client, "095d1f49-41c8-4716-81f0-35e05303faea", 3)
        .await
        .unwrap();

    let published = sidecar.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, STOCK_REDUCTION_TOPIC);

    let event = Payload::from(published[0].data.clone().unwrap())
        .parse_as::<StorageReduceData>()
        .unwrap();
    assert_eq!(event.product_id, "095d1f49-41c8-4716-81f0-35e05303faea");
    assert_eq!(event.amount, 3);
}

#[tokio::test]
async fn test_publish_after_shutdown_fails() {
    let mut client = client_for(FakeSidecar::default());
    client.shutdown().await;

    let result = caller::publish_stock_reduction(&client, "p-1", 1).await;

    assert!(matches!(
        result,
        Err(CallerError::Sidecar(SidecarError::Closed))
    ));
}

fn order() -> CreateOrderRequest {
    CreateOrderRequest {
        product_id: "095d1f49-41c8-4716-81f0-35e05303faea".to_string(),
        amount: 20,
        customer_id: "0d158a88-73de-42e5-87c7-fdbc00bdc5f9".to_string(),
    }
}

#[tokio::test]
async fn test_accepted_order_publishes_the_stock_reduction() {
    let sidecar = FakeSidecar::default();
    let client = client_for(sidecar.clone());

    let outcome = caller::create_order(&client, &order()).await.unwrap();

    assert_eq!(outcome, OrderOutcome::Placed);

    let invoked = sidecar.invoked.lock().unwrap();
    assert_eq!(invoked.len(), 1);
    assert_eq!(invoked[0].id, ORDER_SERVICE);
    assert_eq!(invoked[0].method, CREATE_ORDER_METHOD);
    let sent = Payload::from(invoked[0].data.clone().unwrap())
        .parse_as::<CreateOrderRequest>()
        .unwrap();
    assert_eq!(sent, order());

    let published = sidecar.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, STOCK_REDUCTION_TOPIC);
    let event = Payload::from(published[0].data.clone().unwrap())
        .parse_as::<StorageReduceData>()
        .unwrap();
    assert_eq!(event.product_id, order().product_id);
    assert_eq!(event.amount, 20);
}

#[tokio::test]
async fn test_rejected_order_skips_the_publish() {
    let sidecar = FakeSidecar::rejecting_orders();
    let client = client_for(sidecar.clone());

    let outcome = caller::create_order(&client, &order()).await.unwrap();

    assert_eq!(outcome, OrderOutcome::Rejected);
    assert_eq!(sidecar.invoked.lock().unwrap().len(), 1);
    assert!(sidecar.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_order_call_skips_the_publish() {
    let sidecar = FakeSidecar::failing(Status::unavailable("order service is down"));
    let client = client_for(sidecar.clone());

    let result = caller::create_order(&client, &order()).await;

    assert!(matches!(
        result,
        Err(CallerError::Sidecar(SidecarError::Rpc(_)))
    ));
    assert!(sidecar.published.lock().unwrap().is_empty());
}
