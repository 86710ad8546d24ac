//! Shared helpers for integration tests: a wiremock cost backend and the CLI binary.

#![allow(dead_code)]

use assert_cmd::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TWO_NAMESPACES: &str = r#"{"code":200,"data":[{
    "kube-system":{"name":"kube-system","totalCost":12.5,"cpuCost":8.0,"cpuEfficiency":0.4},
    "default":{"name":"default","totalCost":3.2,"cpuCost":1.1,"cpuEfficiency":0.1}
}]}"#;

pub const USD: &str = r#"{"code":200,"data":{"currencyCode":"USD"}}"#;

/// Helper to get a kubectl-cost command
pub fn kubectl_cost() -> Command {
    let mut cmd = Command::cargo_bin("kubectl-cost").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Mount a JSON response for `GET <route>`
pub async fn respond(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "application/json")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Backend with a currency code and two namespace allocations
pub async fn healthy_backend() -> MockServer {
    let server = MockServer::start().await;
    respond(&server, "/model/getConfigs", 200, USD).await;
    respond(&server, "/model/allocation", 200, TWO_NAMESPACES).await;
    server
}

/// Lines of a rendered table that mention `name`
pub fn rows_with<'a>(output: &'a str, names: &[&str]) -> Vec<&'a str> {
    output
        .lines()
        .filter(|l| names.iter().any(|n| l.contains(n)))
        .collect()
}
