//! Common test data and constants

use uuid::Uuid;

/// Generate a random client ID for testing
pub fn random_client_id() -> String {
    Uuid::new_v4().to_string()
}

/// Base URI nothing listens on
pub const UNREACHABLE_URI: &str = "http://127.0.0.1:1";

/// Common proxy ports
pub mod ports {
    pub const PROXY: u16 = 5200;
    pub const WEB: u16 = 5201;
}
