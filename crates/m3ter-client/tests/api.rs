//! HTTP-level tests against a mock m3ter API.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{
    basic_auth, body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use m3ter_client::{ApiClient, ClientConfig, ClientError, HttpTransport, RetryPolicy};
use m3ter_core::{Account, Bill, Measurement, Meter, Resource};

const ORG: &str = "org-1";

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(ORG, "key", "secret")
        .with_api_url(server.uri())
        .with_ingest_url(server.uri())
        .with_retry(RetryPolicy::immediate(3))
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth("key", "secret"))
        .and(body_json(json!({"grant_type": "client_credentials"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "Bearer",
            "expires_in": 18000
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> ApiClient {
    mount_token(server).await;
    ApiClient::connect(config(server)).await.unwrap()
}

fn org_path(resource: &str) -> String {
    format!("/organizations/{ORG}/{resource}")
}

// ============================================================================
// Token Exchange
// ============================================================================

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(org_path("accounts/acc-1")))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acc-1",
            "code": "SF-1",
            "customFields": {"subsidiaryId": 100}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = api.resource::<Account>().get("acc-1").await.unwrap();
    assert_eq!(account.code(), Some("SF-1"));
}

#[tokio::test]
async fn rejected_credentials_are_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})))
        .mount(&server)
        .await;

    let err = ApiClient::connect(config(&server)).await.unwrap_err();
    assert!(matches!(err, ClientError::Auth(_)), "got {err}");
}

#[tokio::test]
async fn token_response_without_token_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&server)
        .await;

    let err = ApiClient::connect(config(&server)).await.unwrap_err();
    assert!(matches!(err, ClientError::Auth(_)), "got {err}");
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn create_posts_full_attribute_set() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(org_path("meters")))
        .and(body_json(json!({
            "code": "checks",
            "name": "Checks",
            "dataFields": [],
            "derivedFields": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m-1",
            "code": "checks",
            "name": "Checks",
            "version": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let meter = Meter {
        code: Some("checks".into()),
        name: Some("Checks".into()),
        ..Meter::default()
    };
    let created = api.resource::<Meter>().create(&meter).await.unwrap();
    assert_eq!(created.id(), Some("m-1"));
    assert_eq!(created.version, Some(1));
}

#[tokio::test]
async fn update_puts_full_attribute_set() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("PUT"))
        .and(path(org_path("accounts/acc-1")))
        .and(body_json(json!({
            "id": "acc-1",
            "name": "Acme",
            "code": "SF-1",
            "parentAccountId": "acc-0",
            "version": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acc-1",
            "name": "Acme",
            "code": "SF-1",
            "parentAccountId": "acc-0",
            "version": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = Account {
        id: Some("acc-1".into()),
        name: Some("Acme".into()),
        code: Some("SF-1".into()),
        parent_account_id: Some("acc-0".into()),
        version: Some(3),
        ..Account::default()
    };
    let updated = api
        .resource::<Account>()
        .update("acc-1", &account)
        .await
        .unwrap();
    assert_eq!(updated.version, Some(4));
}

#[tokio::test]
async fn non_json_success_is_decode_error() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(org_path("meters/m-1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = api.resource::<Meter>().get("m-1").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {err}");
}

// ============================================================================
// Delete Retry
// ============================================================================

#[tokio::test]
async fn delete_retries_server_errors() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(org_path("meters/m-1")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(org_path("meters/m-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let body = api.resource::<Meter>().delete("m-1").await.unwrap();
    assert_eq!(body["id"], "m-1");
}

#[tokio::test]
async fn delete_does_not_retry_client_errors() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(org_path("meters/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = api.resource::<Meter>().delete("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn delete_gives_up_after_three_attempts() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(org_path("meters/m-1")))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = api.resource::<Meter>().delete("m-1").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn delete_with_empty_body_is_null() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("DELETE"))
        .and(path(org_path("meters/m-1")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = api.resource::<Meter>().delete("m-1").await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    // Nothing listens on the discard port.
    let config = ClientConfig::new(ORG, "key", "secret").with_api_url("http://127.0.0.1:9");
    let transport = Arc::new(HttpTransport::new(std::time::Duration::from_secs(2)).unwrap());
    let err = ApiClient::connect_with(config, transport).await.unwrap_err();
    assert!(err.is_retryable(), "got {err}");
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn load_follows_next_token() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(org_path("bills")))
        .and(query_param_is_missing("nextToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "b-1"}, {"id": "b-2"}],
            "nextToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(org_path("bills")))
        .and(query_param("nextToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "b-3"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bills = api.resource::<Bill>().load().await.unwrap();
    let ids: Vec<_> = bills.iter().filter_map(Bill::id).collect();
    assert_eq!(ids, ["b-1", "b-2", "b-3"]);
}

// ============================================================================
// Resource-Specific Endpoints
// ============================================================================

#[tokio::test]
async fn bills_for_account_unwraps_data() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(org_path("bills/accountid/acc-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "b-1", "accountId": "acc-1", "lineItems": []}]
        })))
        .mount(&server)
        .await;

    let bills = api.bills_for_account("acc-1").await.unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].account_id.as_deref(), Some("acc-1"));
}

#[tokio::test]
async fn organization_config_is_fetched_without_id() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(org_path("organizationconfig")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "UTC",
            "currency": "USD",
            "daysBeforeBillDue": 14
        })))
        .mount(&server)
        .await;

    let config = api.organization_config().await.unwrap();
    assert_eq!(config.currency.as_deref(), Some("USD"));
    assert_eq!(config.days_before_bill_due, Some(14));
}

#[tokio::test]
async fn measurements_go_to_ingest_host() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(org_path("measurements")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "accepted"})))
        .expect(1)
        .mount(&server)
        .await;

    let measurement = Measurement::now("checks", "SF-1").with_measure(json!({"count": 2}));
    let response = api.submit_measurements(&[measurement]).await.unwrap();
    assert_eq!(response["result"], "accepted");

    let requests = server.received_requests().await.unwrap();
    let submitted = requests
        .iter()
        .find(|r| r.url.path().ends_with("/measurements"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&submitted.body).unwrap();
    assert_eq!(body["measurements"][0]["meter"], "checks");
    assert_eq!(body["measurements"][0]["measure"]["count"], 2);
}

#[tokio::test]
async fn aggregation_timeout_yields_no_values() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("GET"))
        .and(path(org_path("measurements/aggregations/agg-1")))
        .and(query_param("accountCode", "SF-1"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let values = api
        .measurements_for_aggregation("agg-1", "2024-01-01", "2024-02-01", "SF-1")
        .await
        .unwrap();
    assert_eq!(values, json!({"values": []}));
}

#[tokio::test]
async fn usage_query_returns_raw_json() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    Mock::given(method("POST"))
        .and(path(org_path("dataexplorer/usagedata")))
        .and(body_json(json!({"meterCodes": ["checks"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"count": 5}]})))
        .mount(&server)
        .await;

    let result = api
        .query_usage(&json!({"meterCodes": ["checks"]}))
        .await
        .unwrap();
    assert_eq!(result["data"][0]["count"], 5);
}
