//! Direct-endpoint and service-proxy transports against a mock cost backend
mod common;

use chrono::Utc;
use kubectl_cost::{
    BackendOptions, CostOptions, CostTransport, DisplayOptions, EndpointTransport, QueryError,
    ServiceProxyTransport, allocation_params, query_allocation, run_aggregated_allocation,
};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{TWO_NAMESPACES, USD, healthy_backend, respond, rows_with};

const PROXIED_ALLOCATION: &str =
    "/api/v1/namespaces/kubecost/services/http:kubecost-cost-analyzer:9090/proxy/model/allocation";

fn transport(server: &MockServer) -> EndpointTransport {
    EndpointTransport::new(Url::parse(&server.uri()).unwrap()).unwrap()
}

/// Service proxy transport whose API server is the mock
fn proxy_transport(server: &MockServer) -> ServiceProxyTransport {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    let config = kube::Config::new(server.uri().parse().unwrap());
    ServiceProxyTransport::new(config, &BackendOptions::default()).unwrap()
}

#[tokio::test]
async fn test_allocation_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model/allocation"))
        .and(query_param("window", "5d"))
        .and(query_param("aggregate", "namespace,deployment"))
        .and(query_param("accumulate", "true"))
        .and(query_param("filterNamespaces", "foo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_NAMESPACES))
        .expect(1)
        .mount(&server)
        .await;

    let params = allocation_params("5d", &["namespace", "deployment"], Some("foo"));
    let sets = query_allocation(&transport(&server), &params, &Default::default())
        .await
        .unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
}

#[tokio::test]
async fn test_non_success_status_is_backend_error() {
    let server = MockServer::start().await;
    respond(&server, "/model/allocation", 503, "unavailable").await;

    let err = transport(&server)
        .get("/model/allocation", &Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Backend { code: 503, .. }));
}

#[tokio::test]
async fn test_render_against_backend() {
    let server = healthy_backend().await;
    let query = CostOptions {
        window: "5d".to_string(),
        display: DisplayOptions {
            show_cpu: true,
            ..Default::default()
        },
        historical: true,
        ..Default::default()
    }
    .complete()
    .validate(Utc::now())
    .unwrap();

    let mut out = Vec::new();
    run_aggregated_allocation(&transport(&server), &query, &["namespace"], &mut out)
        .await
        .unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("Total Cost (USD)"));
    let rows = rows_with(&output, &["kube-system", "default"]);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("12.50"));
    assert!(rows[1].contains("3.20"));
}

#[tokio::test]
async fn test_currency_outage_degrades() {
    let server = MockServer::start().await;
    respond(&server, "/model/getConfigs", 500, "boom").await;
    respond(&server, "/model/allocation", 200, TWO_NAMESPACES).await;
    let query = CostOptions::default().validate(Utc::now()).unwrap();

    let mut out = Vec::new();
    run_aggregated_allocation(&transport(&server), &query, &["namespace"], &mut out)
        .await
        .unwrap();
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Projected Monthly Rate"));
    assert!(!output.contains("(USD)"));
}

#[tokio::test]
async fn test_allocation_outage_is_fatal() {
    let server = MockServer::start().await;
    respond(&server, "/model/getConfigs", 200, USD).await;
    respond(&server, "/model/allocation", 500, "internal error").await;
    let query = CostOptions::default().validate(Utc::now()).unwrap();

    let mut out = Vec::new();
    let err = run_aggregated_allocation(&transport(&server), &query, &["namespace"], &mut out)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to query allocation API"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_proxy_allocation_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROXIED_ALLOCATION))
        .and(query_param("window", "1d"))
        .and(query_param("aggregate", "namespace"))
        .and(query_param("accumulate", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_NAMESPACES))
        .expect(1)
        .mount(&server)
        .await;

    let params = allocation_params("1d", &["namespace"], None);
    let sets = query_allocation(&proxy_transport(&server), &params, &BackendOptions::default())
        .await
        .unwrap();
    assert_eq!(sets.len(), 1);
    let names: Vec<&str> = sets[0].iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["kube-system", "default"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_proxy_server_error() {
    let server = MockServer::start().await;
    respond(&server, PROXIED_ALLOCATION, 500, "internal error").await;

    let params = allocation_params("1d", &["namespace"], None);
    let err = query_allocation(&proxy_transport(&server), &params, &BackendOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Transport { .. }));
}
