//! Mock ManagerITM server for testing
//!
//! A wiremock server answering the ManagerITM endpoints, so clients can be
//! exercised without a real remote host.

use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub struct MockManagerServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockManagerServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Expect exactly one `POST /client/proxy` with `expected_body`
    pub async fn mock_proxy_client(&self, expected_body: Value, response: Value) {
        Mock::given(method("POST"))
            .and(path("/client/proxy"))
            .and(body_json(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Expect exactly one `POST /client/command` with `expected_body`
    pub async fn mock_command_client(&self, expected_body: Value, response: Value) {
        Mock::given(method("POST"))
            .and(path("/client/command"))
            .and(body_json(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Answer any `POST /client/proxy` with the given client ID
    pub async fn mock_any_proxy_client(&self, client_id: &str) {
        Mock::given(method("POST"))
            .and(path("/client/proxy"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "client_id": client_id })),
            )
            .mount(&self.server)
            .await;
    }

    /// Expect exactly `times` calls to `{verb} /{client_id}/{action}`
    pub async fn mock_lifecycle(
        &self,
        verb: &str,
        client_id: &str,
        action: &str,
        status: Option<i64>,
        times: u64,
    ) {
        Mock::given(method(verb))
            .and(path(format!("/{}/{}", client_id, action)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": status })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_start(&self, client_id: &str, status: Option<i64>) {
        self.mock_lifecycle("POST", client_id, "start", status, 1).await;
    }

    pub async fn mock_status(&self, client_id: &str, status: Option<i64>) {
        self.mock_lifecycle("GET", client_id, "status", status, 1).await;
    }

    pub async fn mock_stop(&self, client_id: &str, status: Option<i64>) {
        self.mock_lifecycle("POST", client_id, "stop", status, 1).await;
    }

    /// `GET /{client_id}/status` reports running for the first `running_polls`
    /// calls, then `exit_status`
    pub async fn mock_status_sequence(
        &self,
        client_id: &str,
        running_polls: u64,
        exit_status: i64,
    ) {
        let status_path = format!("/{}/status", client_id);
        Mock::given(method("GET"))
            .and(path(status_path.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": null })))
            .up_to_n_times(running_polls)
            .with_priority(1)
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(status_path))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": exit_status })),
            )
            .with_priority(2)
            .mount(&self.server)
            .await;
    }

    /// `GET /{client_id}/status` always reports running
    pub async fn mock_always_running(&self, client_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/status", client_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": null })))
            .mount(&self.server)
            .await;
    }

    /// Expect exactly one teardown `DELETE /{client_id}` answered with `status_code`
    pub async fn mock_delete(&self, client_id: &str, status_code: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/{}", client_id)))
            .respond_with(ResponseTemplate::new(status_code))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Any request to `endpoint` with `verb` fails with `status_code`
    pub async fn mock_error(&self, verb: &str, endpoint: &str, status_code: u16, error_msg: &str) {
        Mock::given(method(verb))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": error_msg
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received so far, as `"METHOD /path"`
    pub async fn request_lines(&self) -> Vec<String> {
        self.requests()
            .await
            .iter()
            .map(|r| format!("{} {}", r.method, r.url.path()))
            .collect()
    }

    /// Wait up to `timeout` for a request matching `verb` and `request_path`
    pub async fn wait_for_request(&self, verb: Method, request_path: &str, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            let seen = self
                .requests()
                .await
                .iter()
                .any(|r| r.method.as_str() == verb.as_str() && r.url.path() == request_path);
            if seen {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }
}
