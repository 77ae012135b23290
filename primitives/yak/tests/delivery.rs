use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::post,
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use yak::{Settings, YakError};

const HOOK_PATH: &str = "/services/hooks/incoming-webhook";

/// One request as seen by the fake webhook.
#[derive(Debug, Clone)]
struct Received {
    query: HashMap<String, String>,
    form: HashMap<String, String>,
}

#[derive(Clone)]
struct Hook {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<Received>>>,
}

async fn handle(
    State(hook): State<Hook>,
    Query(query): Query<HashMap<String, String>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    hook.seen.lock().unwrap().push(Received { query, form });
    (hook.status, hook.body)
}

/// Starts a fake webhook answering with `status` and `body`. Returns the URL
/// to post to and the requests it receives.
async fn serve(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Vec<Received>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let hook = Hook {
        status,
        body,
        seen: seen.clone(),
    };

    let app = Router::new().route(HOOK_PATH, post(handle)).with_state(hook);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}{HOOK_PATH}?token=abc123"), seen)
}

fn settings(icon: &str) -> Settings {
    Settings {
        domain: "acme".into(),
        token: "abc123".into(),
        channel: "#general".into(),
        username: "yakbot".into(),
        icon: icon.into(),
    }
}

#[tokio::test]
async fn test_ok_response_is_echoed() {
    let (url, seen) = serve(StatusCode::OK, "ok").await;

    let mut out = Vec::new();
    yak::send(&settings(":speech_balloon:"), "deploy finished", &url, &mut out)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "ok\n");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_payload_is_sent_as_form_field() {
    let (url, seen) = serve(StatusCode::OK, "ok").await;

    let mut out = Vec::new();
    yak::send(&settings("https://example.com/yak.png"), "hello world", &url, &mut out)
        .await
        .unwrap();

    let received = seen.lock().unwrap()[0].clone();
    assert_eq!(received.query.get("token").map(String::as_str), Some("abc123"));
    assert_eq!(received.form.len(), 1);

    let payload: Value = serde_json::from_str(&received.form["payload"]).unwrap();
    assert_eq!(
        payload,
        json!({
            "channel": "#general",
            "username": "yakbot",
            "text": "hello world",
            "icon_url": "https://example.com/yak.png",
        })
    );
}

#[tokio::test]
async fn test_empty_message_omits_text() {
    let (url, seen) = serve(StatusCode::OK, "ok").await;

    let mut out = Vec::new();
    yak::send(&settings(":yak:"), "", &url, &mut out).await.unwrap();

    let received = seen.lock().unwrap()[0].clone();
    let payload: Value = serde_json::from_str(&received.form["payload"]).unwrap();
    assert!(payload.get("text").is_none());
    assert_eq!(payload["icon_emoji"], ":yak:");
}

#[tokio::test]
async fn test_not_found_warns_but_succeeds() {
    let (url, _seen) = serve(StatusCode::NOT_FOUND, "No service").await;

    let mut out = Vec::new();
    yak::send(&settings(":yak:"), "hi", &url, &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Warning: received non-200 status 404\nNo service\n"
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}{HOOK_PATH}?token=abc123");
    let mut out = Vec::new();
    let err = yak::send(&settings(":yak:"), "hi", &url, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, YakError::Transport(_)));
    assert!(err.to_string().starts_with("Error while submitting message:"));
    assert!(out.is_empty());
}
