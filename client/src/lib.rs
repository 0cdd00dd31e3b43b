//! Client for the ManagerITM service, which provisions short-lived proxy and
//! command-execution processes on a remote host.

pub mod clients;
pub mod config;
pub mod constants;
pub mod errors;
pub mod http;
pub mod runner;

// Re-export commonly used types
pub use clients::{
    ClientHandle, CommandClient, CommandRequest, CommandResponse, ProxyClient, ProxyRequest,
    ProxyResponse, StatusResponse,
};
pub use config::{Config, ConfigManager};
pub use errors::{ClientError, ConfigError, PreconditionError, RemoteRequestError};
pub use http::Transport;
pub use runner::{run_session, SessionReport};
