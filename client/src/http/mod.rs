//! HTTP communication with the ManagerITM service
//!
//! Every handle owns a [`Transport`] bound to the service's base URI. Paths
//! are appended verbatim to that URI.
//!
//! # Communication Pattern
//!
//! ```text
//! Handle → Transport → ManagerITM (base_uri + path)
//!                ↓
//!        2xx: decoded JSON body
//!    non-2xx: RemoteRequestError::Status
//! ```

pub mod transport;

pub use transport::Transport;
