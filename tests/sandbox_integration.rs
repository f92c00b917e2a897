use devportal_sandbox::routes::create_router;
use devportal_sandbox::seed::{load_seed_data, SeededSandbox};
use devportal_sandbox::store::{EndpointStore, MemoryStore, ProxyStore};
use devportal_sandbox::{NewEndpoint, RequirementDescriptor};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

/// Start the sandbox on an ephemeral port backed by a seeded in-memory store
async fn start_server() -> (TestClient, Arc<MemoryStore>, SeededSandbox) {
    let store = Arc::new(MemoryStore::new());
    let seeded = load_seed_data(&*store).await.expect("Failed to seed store");

    let app: axum::Router = create_router().with_state(store.clone());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server crashed");
    });

    (TestClient::new(format!("http://{}", address)), store, seeded)
}

async fn play(client: &TestClient, request: Value) -> (StatusCode, Option<String>, Value) {
    let response = client
        .post("/sandbox/play", request)
        .await
        .expect("Failed to call play endpoint");
    let status = response.status();
    let resolution = response
        .headers()
        .get("x-sandbox-resolution")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let body = response.json::<Value>().await.expect("Response is not JSON");
    (status, resolution, body)
}

#[tokio::test]
async fn test_health_check() {
    let (client, _, _) = start_server().await;

    let response = client.get("/health").await.expect("Failed to call health");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_play_matches_recorded_body() {
    let (client, _, seeded) = start_server().await;

    let (status, resolution, body) = play(
        &client,
        json!({
            "endpoint_id": seeded.create_transfer_id,
            "json_body": {"currency": "EUR", "to": "acc_2", "amount": 1000}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "code": 200,
            "message": "OK",
            "result": {"status": "200", "data": "{\"id\":\"tr_1\",\"status\":\"pending\"}"}
        })
    );
    assert!(resolution.unwrap().starts_with("recorded;"));
}

#[tokio::test]
async fn test_play_unmatched_body_returns_default() {
    let (client, _, seeded) = start_server().await;

    let (status, resolution, body) = play(
        &client,
        json!({
            "endpoint_id": seeded.create_transfer_id.to_string(),
            "json_body": {"amount": 5}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "401");
    assert_eq!(
        body["result"]["data"],
        "{\"message\":\"Invalid Access Token\"}"
    );
    assert_eq!(resolution.as_deref(), Some("default;reason=no_match"));
}

#[tokio::test]
async fn test_play_path_mismatch_returns_unauthorized_example() {
    let (client, _, seeded) = start_server().await;

    let (_, resolution, body) = play(
        &client,
        json!({
            "endpoint_id": seeded.get_account_id,
            "path_param": [{"name": "id", "value": "acc_404"}]
        }),
    )
    .await;

    assert_eq!(body["result"]["status"], "401");
    assert_eq!(body["result"]["data"], "{\"error\":\"unknown account\"}");
    assert!(resolution.unwrap().ends_with("failed=path"));

    let (_, _, body) = play(
        &client,
        json!({
            "endpoint_id": seeded.get_account_id,
            "path_param": [{"name": "id", "value": "acc_1"}]
        }),
    )
    .await;
    assert_eq!(body["result"]["status"], "200");
}

#[tokio::test]
async fn test_play_header_requirements() {
    let (client, _, seeded) = start_server().await;

    let (_, _, body) = play(
        &client,
        json!({
            "endpoint_id": seeded.list_payments_id,
            "header_param": [{"name": "Authorization", "value": "Bearer wrong"}]
        }),
    )
    .await;
    assert_eq!(body["result"]["data"], "{\"error\":\"missing or invalid token\"}");

    let (_, _, body) = play(
        &client,
        json!({
            "endpoint_id": seeded.list_payments_id,
            "header_param": [{"name": "Authorization", "value": "Bearer sandbox-token"}]
        }),
    )
    .await;
    assert_eq!(body["result"]["status"], "200");
}

#[tokio::test]
async fn test_play_unknown_endpoint_returns_default() {
    let (client, _, _) = start_server().await;

    let (status, resolution, body) = play(&client, json!({"endpoint_id": 424242})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "401");
    assert_eq!(
        resolution.as_deref(),
        Some("default;reason=endpoint_unavailable")
    );
}

#[tokio::test]
async fn test_unpublished_proxy_hides_endpoints() {
    let (client, store, seeded) = start_server().await;
    store
        .set_proxy_published(seeded.proxy_id, false)
        .await
        .unwrap();

    let response = client
        .get(&format!("/sandbox/endpoints/{}", seeded.get_account_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 404);

    let (_, resolution, _) = play(&client, json!({"endpoint_id": seeded.get_account_id})).await;
    assert_eq!(
        resolution.as_deref(),
        Some("default;reason=endpoint_unavailable")
    );
}

#[tokio::test]
async fn test_get_endpoint_decodes_requirements() {
    let (client, _, seeded) = start_server().await;

    let response = client
        .get(&format!("/sandbox/endpoints/{}", seeded.list_payments_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["path"], "/v1/payments");
    assert_eq!(body["result"]["path_params"], json!([]));
    assert_eq!(
        body["result"]["header_param"][0],
        json!({"name": "Authorization", "value": "Bearer sandbox-token", "is_required": true})
    );
}

#[tokio::test]
async fn test_list_examples_returns_latest_per_status() {
    let (client, _, seeded) = start_server().await;

    let response = client
        .get(&format!("/sandbox/endpoints/{}/examples", seeded.get_account_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let statuses: Vec<&str> = body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|schema| schema["status_code"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["200", "401"]);
}

#[tokio::test]
async fn test_play_rejects_non_numeric_endpoint_id() {
    let (client, _, _) = start_server().await;

    let response = client
        .post("/sandbox/play", json!({"endpoint_id": "not-a-number"}))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_endpoint_with_requirements_but_no_examples() {
    let (client, store, seeded) = start_server().await;
    let endpoint = store
        .create_endpoint(NewEndpoint {
            proxy_id: seeded.proxy_id,
            name: "Delete account".to_string(),
            method: "DELETE".to_string(),
            path: "/v1/accounts/{id}".to_string(),
            path_params: vec![RequirementDescriptor::required("id", json!("acc_1"))],
            header_param: vec![],
        })
        .await
        .unwrap();

    // Failed validation with no 401 example falls through to the default
    let (status, resolution, body) = play(&client, json!({"endpoint_id": endpoint.id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "401");
    assert_eq!(resolution.as_deref(), Some("default;reason=no_match"));
}
