//! Integration test: start the gateway on a free port with the keyword analyzer and
//! drive the webhook, stats and dashboard routes over HTTP. Does not require Ollama.
//! Server tasks are left running when a test ends.

use serde_json::{json, Value};
use smartmail::config::Config;
use smartmail::gateway::{self, GatewayState};
use smartmail::platforms::NO_TEXT_MESSAGE;
use std::time::Duration;

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

/// Start a gateway and wait until GET / answers. Returns the base URL.
async fn start_gateway(dashboard: bool) -> String {
    let port = free_port();
    let mut config = Config::default();
    config.gateway.bind = "127.0.0.1".to_string();
    config.dashboard.enabled = dashboard;
    let mut state = GatewayState::from_config(config);
    state.port = port;

    tokio::spawn(async move {
        let _ = gateway::run_with_state(state).await;
    });

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();
    let mut last_err = None;
    for _ in 0..100 {
        match client.get(format!("{}/", base)).send().await {
            Ok(resp) if resp.status().is_success() => {
                let json: Value = resp.json().await.expect("parse JSON");
                assert_eq!(json.get("runtime").and_then(|v| v.as_str()), Some("running"));
                assert_eq!(json.get("port").and_then(|v| v.as_u64()), Some(port as u64));
                return base;
            }
            Ok(_) => {}
            Err(e) => last_err = Some(e),
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!(
        "GET {}/ did not return 200 within 5s; last error: {:?}",
        base, last_err
    );
}

#[tokio::test]
async fn cliq_json_webhook_returns_card_and_updates_stats() {
    let base = start_gateway(true).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/webhook", base))
        .json(&json!({ "message": { "text": "This is terrible, I need a refund ASAP" } }))
        .send()
        .await
        .expect("post webhook");
    assert_eq!(resp.status().as_u16(), 200);
    let card: Value = resp.json().await.expect("parse card");
    assert_eq!(card["slides"][0]["data"][0]["value"], "Angry");
    assert_eq!(card["slides"][0]["data"][1]["value"], "High");
    assert_eq!(card["buttons"][0]["label"], "Create Ticket");

    let stats: Value = client
        .get(format!("{}/api/stats", base))
        .send()
        .await
        .expect("get stats")
        .json()
        .await
        .expect("parse stats");
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["angry_count"], 1);
    assert_eq!(stats["high_urgency_count"], 1);
    assert_eq!(stats["recent"][0]["tone"], "Angry");
}

#[tokio::test]
async fn cliq_form_arguments_are_analyzed() {
    let base = start_gateway(true).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/webhook", base))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("arguments=Thank+you%2C+great+support")
        .send()
        .await
        .expect("post form");
    let card: Value = resp.json().await.expect("parse card");
    assert_eq!(card["slides"][0]["data"][0]["value"], "Positive");
}

#[tokio::test]
async fn cliq_form_content_type_is_case_insensitive() {
    let base = start_gateway(true).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/webhook", base))
        .header("Content-Type", "Application/X-WWW-Form-Urlencoded; charset=UTF-8")
        .body("arguments=Urgent%3A+server+is+down")
        .send()
        .await
        .expect("post form");
    let card: Value = resp.json().await.expect("parse card");
    assert_eq!(card["slides"][0]["data"][1]["value"], "High");
}

#[tokio::test]
async fn cliq_multipart_arguments_are_analyzed() {
    let base = start_gateway(true).await;
    let body = "--smartmail\r\n\
Content-Disposition: form-data; name=\"arguments\"\r\n\r\n\
Thank you, love the new release\r\n\
--smartmail--\r\n";
    let resp = reqwest::Client::new()
        .post(format!("{}/webhook", base))
        .header("Content-Type", "multipart/form-data; boundary=smartmail")
        .body(body)
        .send()
        .await
        .expect("post multipart");
    assert_eq!(resp.status().as_u16(), 200);
    let card: Value = resp.json().await.expect("parse card");
    assert_eq!(card["slides"][0]["data"][0]["value"], "Positive");
    assert_eq!(card["slides"][1]["data"], "Thank you, love the new release");
}

#[tokio::test]
async fn failures_still_answer_200_with_fallback_text() {
    let base = start_gateway(true).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/webhook", base))
        .body("{ not json")
        .send()
        .await
        .expect("post malformed");
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.expect("parse fallback");
    assert_eq!(body, json!({ "text": NO_TEXT_MESSAGE }));

    let resp = client
        .post(format!("{}/salesiq/webhook", base))
        .json(&json!({ "visitor": { "name": "Ann" } }))
        .send()
        .await
        .expect("post salesiq");
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.expect("parse fallback");
    assert_eq!(body["replies"], json!([NO_TEXT_MESSAGE]));

    let stats: Value = client
        .get(format!("{}/api/stats", base))
        .send()
        .await
        .expect("get stats")
        .json()
        .await
        .expect("parse stats");
    assert_eq!(stats["total"], 0);
}

#[tokio::test]
async fn salesiq_visitor_message_returns_bubbles() {
    let base = start_gateway(true).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/salesiq/webhook", base))
        .json(&json!({ "visitor": { "message": "Can you resend the invoice?" } }))
        .send()
        .await
        .expect("post salesiq");
    let body: Value = resp.json().await.expect("parse reply");
    assert_eq!(body["action"], "reply");
    assert_eq!(body["replies"][0], "Tone: Neutral | Urgency: Low");
    assert_eq!(body["replies"][1], "📝 Can you resend the invoice?");
}

#[tokio::test]
async fn dashboard_routes_follow_config() {
    let base = start_gateway(true).await;
    let client = reqwest::Client::new();
    let html = client
        .get(format!("{}/dashboard", base))
        .send()
        .await
        .expect("get dashboard")
        .text()
        .await
        .expect("dashboard body");
    assert!(html.contains("const POLL_INTERVAL_MS = 3000;"));

    let base = start_gateway(false).await;
    let resp = client
        .get(format!("{}/api/stats", base))
        .send()
        .await
        .expect("get stats");
    assert_eq!(resp.status().as_u16(), 404);
}
