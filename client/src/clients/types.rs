use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// === REQUEST STRUCTURES ===

/// Body of `POST /client/proxy`. Unset fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webport: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub har: Option<bool>,
}

impl ProxyRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn webport(mut self, webport: u16) -> Self {
        self.webport = Some(webport);
        self
    }

    pub fn har(mut self, har: bool) -> Self {
        self.har = Some(har);
        self
    }

    /// Fill every unset field from `defaults`.
    pub fn or(self, defaults: &ProxyRequest) -> Self {
        Self {
            port: self.port.or(defaults.port),
            webport: self.webport.or(defaults.webport),
            har: self.har.or(defaults.har),
        }
    }
}

/// Body of `POST /client/command`.
///
/// `env` replaces the remote environment, `additional_env` is layered on top
/// of the remote default. Which wins when both are sent is up to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_env: Option<BTreeMap<String, String>>,
}

impl CommandRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env<K, V>(mut self, env: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(env.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn additional_env<K, V>(mut self, env: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.additional_env = Some(env.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Fill every unset field from `defaults`.
    pub fn or(self, defaults: &CommandRequest) -> Self {
        Self {
            env: self.env.or_else(|| defaults.env.clone()),
            additional_env: self.additional_env.or_else(|| defaults.additional_env.clone()),
        }
    }
}

// === RESPONSE STRUCTURES ===

/// Decoded `POST /client/proxy` response.
///
/// Everything besides `client_id` is kept in `extra` exactly as the server
/// sent it. The server may assign `port`/`webport` even when the caller left
/// them out; [`ProxyResponse::port`] and [`ProxyResponse::webport`] read them
/// when they are valid port numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    pub client_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProxyResponse {
    pub fn port(&self) -> Option<u16> {
        self.port_field("port")
    }

    pub fn webport(&self) -> Option<u16> {
        self.port_field("webport")
    }

    fn port_field(&self, key: &str) -> Option<u16> {
        self.extra
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|port| u16::try_from(port).ok())
    }
}

/// Decoded `POST /client/command` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub client_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Provisioning responses all carry the server-assigned identifier.
pub trait Provisioned {
    fn client_id(&self) -> &str;
}

impl Provisioned for ProxyResponse {
    fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl Provisioned for CommandResponse {
    fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// `{status}` as returned by start, status and stop.
///
/// `None` means the process is still running, a non-negative value is its
/// exit code and a negative value flags an abnormal start or exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Option<i64>,
}

impl StatusResponse {
    pub fn is_running(&self) -> bool {
        self.status.is_none()
    }

    /// Exit code of a process that finished normally.
    pub fn exit_code(&self) -> Option<i64> {
        self.status.filter(|code| *code >= 0)
    }

    pub fn is_abnormal(&self) -> bool {
        matches!(self.status, Some(code) if code < 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_proxy_request_serializes_to_empty_object() {
        let body = serde_json::to_value(ProxyRequest::new()).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_proxy_request_only_carries_supplied_fields() {
        let body = serde_json::to_value(ProxyRequest::new().port(5200)).unwrap();
        assert_eq!(body, json!({"port": 5200}));

        let body = serde_json::to_value(ProxyRequest::new().webport(5201).har(false)).unwrap();
        assert_eq!(body, json!({"webport": 5201, "har": false}));
    }

    #[test]
    fn test_command_request_omits_unset_env() {
        let body = serde_json::to_value(CommandRequest::new()).unwrap();
        assert_eq!(body, json!({}));

        let body =
            serde_json::to_value(CommandRequest::new().additional_env([("VARIABLE", "VALUE")]))
                .unwrap();
        assert_eq!(body, json!({"additional_env": {"VARIABLE": "VALUE"}}));
    }

    #[test]
    fn test_request_defaults_fill_only_missing_fields() {
        let defaults = ProxyRequest::new().port(8080).webport(8081).har(true);
        let merged = ProxyRequest::new().port(5200).or(&defaults);
        assert_eq!(merged, ProxyRequest::new().port(5200).webport(8081).har(true));

        let defaults = CommandRequest::new().env([("A", "1")]);
        let merged = CommandRequest::new().additional_env([("B", "2")]).or(&defaults);
        assert_eq!(merged.env, defaults.env);
        assert_eq!(merged.additional_env.unwrap()["B"], "2");
    }

    #[test]
    fn test_proxy_response_keeps_echoed_fields() {
        let raw = json!({
            "client_id": "abc",
            "port": 5200,
            "webport": 5201,
            "har": true
        });
        let response: ProxyResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(response.client_id, "abc");
        assert_eq!(response.port(), Some(5200));
        assert_eq!(response.webport(), Some(5201));
        assert_eq!(response.extra["har"], json!(true));
        assert_eq!(serde_json::to_value(&response).unwrap(), raw);
    }

    #[test]
    fn test_proxy_response_tolerates_unexpected_port_values() {
        let raw = json!({
            "client_id": "abc",
            "port": null,
            "webport": "5201"
        });
        let response: ProxyResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(response.port(), None);
        assert_eq!(response.webport(), None);
        assert_eq!(serde_json::to_value(&response).unwrap(), raw);

        let out_of_range: ProxyResponse =
            serde_json::from_value(json!({"client_id": "abc", "port": 70000})).unwrap();
        assert_eq!(out_of_range.port(), None);
    }

    #[test]
    fn test_status_interpretation() {
        let running = StatusResponse { status: None };
        assert!(running.is_running());
        assert_eq!(running.exit_code(), None);

        let exited = StatusResponse { status: Some(1) };
        assert!(!exited.is_running());
        assert_eq!(exited.exit_code(), Some(1));
        assert!(!exited.is_abnormal());

        let failed = StatusResponse { status: Some(-1) };
        assert!(failed.is_abnormal());
        assert_eq!(failed.exit_code(), None);
    }

    #[test]
    fn test_null_status_round_trips_as_null() {
        let status: StatusResponse = serde_json::from_value(json!({"status": null})).unwrap();
        assert_eq!(serde_json::to_value(status).unwrap(), json!({"status": null}));
    }
}
