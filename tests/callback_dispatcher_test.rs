mod helpers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use serde_json::{Value, json};

use whisper_relay::application::ports::{
    CallbackDeliveryError, CallbackDispatcher, CallbackPayload,
};
use whisper_relay::domain::JobId;
use whisper_relay::infrastructure::callback::HttpCallbackDispatcher;

use helpers::{callback_target, closed_addr, spawn_server};

fn dispatcher(timeout: Duration) -> HttpCallbackDispatcher {
    HttpCallbackDispatcher::new(timeout).unwrap()
}

#[tokio::test]
async fn given_listening_webhook_when_sending_then_posts_payload_once() {
    let received: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = Arc::clone(&received);
    let app = Router::new().route(
        "/hook",
        post(move |Json(body): Json<Value>| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(body);
                StatusCode::OK
            }
        }),
    );
    let addr = spawn_server(app).await;
    let job_id = JobId::new();
    let target = callback_target(&format!("http://{}/hook", addr), &[("chat_id", "42")]);

    dispatcher(Duration::from_secs(5))
        .send(&target, &CallbackPayload::completed(job_id, "ok", &target))
        .await
        .unwrap();

    let received = received.lock().unwrap().clone();
    assert_eq!(
        received,
        vec![json!({"job_id": job_id.to_string(), "chat_id": "42", "transcript": "ok"})]
    );
}

#[tokio::test]
async fn given_webhook_answering_500_when_sending_then_reports_rejection() {
    let app = Router::new().route("/hook", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let addr = spawn_server(app).await;
    let target = callback_target(&format!("http://{}/hook", addr), &[]);

    let result = dispatcher(Duration::from_secs(5))
        .send(&target, &CallbackPayload::failed(JobId::new(), "x", &target))
        .await;

    assert!(matches!(result, Err(CallbackDeliveryError::Rejected(500))));
}

#[tokio::test]
async fn given_unreachable_webhook_when_sending_then_reports_network_error() {
    let addr = closed_addr().await;
    let target = callback_target(&format!("http://{}/hook", addr), &[]);

    let result = dispatcher(Duration::from_secs(5))
        .send(&target, &CallbackPayload::completed(JobId::new(), "ok", &target))
        .await;

    assert!(matches!(result, Err(CallbackDeliveryError::Network(_))));
}

#[tokio::test]
async fn given_slow_webhook_when_sending_then_times_out() {
    let app = Router::new().route(
        "/hook",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let addr = spawn_server(app).await;
    let target = callback_target(&format!("http://{}/hook", addr), &[]);

    let result = dispatcher(Duration::from_millis(200))
        .send(&target, &CallbackPayload::completed(JobId::new(), "ok", &target))
        .await;

    assert!(matches!(result, Err(CallbackDeliveryError::Timeout(_))));
}
