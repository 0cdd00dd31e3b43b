//! Central repository for endpoint paths, defaults and limits
//!
//! Constants are grouped by category so the HTTP paths and the configuration
//! defaults have a single source of truth.

use std::time::Duration;

/// ManagerITM REST endpoints
///
/// Per-instance paths take the output of [`endpoints::segment`], never a raw
/// identifier.
pub mod endpoints {
    use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

    /// Provision a proxy instance
    pub const PROXY_CLIENT: &str = "/client/proxy";

    /// Provision a command-execution instance
    pub const COMMAND_CLIENT: &str = "/client/command";

    /// Bytes that would end or restructure a path segment
    const SEGMENT: &AsciiSet = &CONTROLS
        .add(b' ')
        .add(b'"')
        .add(b'#')
        .add(b'%')
        .add(b'/')
        .add(b'<')
        .add(b'>')
        .add(b'?')
        .add(b'\\')
        .add(b'^')
        .add(b'`')
        .add(b'{')
        .add(b'|')
        .add(b'}');

    /// Percent-encode a client identifier as a single path segment.
    ///
    /// `None` for identifiers no URL can address: empty, `.` and `..`
    /// (URL parsers resolve dot segments even when encoded).
    pub fn segment(client_id: &str) -> Option<String> {
        if matches!(client_id, "" | "." | "..") {
            return None;
        }
        Some(utf8_percent_encode(client_id, SEGMENT).to_string())
    }

    pub fn start(segment: &str) -> String {
        format!("/{}/start", segment)
    }

    pub fn status(segment: &str) -> String {
        format!("/{}/status", segment)
    }

    pub fn stop(segment: &str) -> String {
        format!("/{}/stop", segment)
    }

    /// Teardown target for a remote instance
    pub fn instance(segment: &str) -> String {
        format!("/{}", segment)
    }
}

/// Session and polling defaults
pub mod session {
    use super::Duration;

    /// Interval between status polls while waiting for a process to exit
    pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

    /// How long a session waits for the remote process before stopping it
    pub const MAX_WAIT: Duration = Duration::from_secs(300);

    /// Upper bound accepted for a configured or command-line max wait (7 days)
    pub const MAX_WAIT_LIMIT_SECS: u64 = 7 * 24 * 60 * 60;
}

/// Configuration file and environment names
pub mod config {
    /// Default configuration directory
    pub const DEFAULT_DIR: &str = "config";

    /// Main configuration file inside the configuration directory
    pub const MAIN_FILE: &str = "main.toml";

    /// Environment variable overriding `base_uri`
    pub const URI_ENV: &str = "MANAGERITM_URI";
}
