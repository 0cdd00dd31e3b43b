//! ManagerITM clients
//!
//! [`ClientHandle`] carries the lifecycle shared by every remote instance
//! (start, status, stop, teardown). [`ProxyClient`] and [`CommandClient`] own
//! a handle and add the call that provisions their kind of instance.
//!
//! ```text
//! uninitialized → client() → provisioned → start ⇄ stop (status polls) → close
//! ```

pub mod command;
pub mod handle;
pub mod proxy;
pub mod types;

pub use command::CommandClient;
pub use handle::ClientHandle;
pub use proxy::ProxyClient;
pub use types::{
    CommandRequest, CommandResponse, Provisioned, ProxyRequest, ProxyResponse, StatusResponse,
};
