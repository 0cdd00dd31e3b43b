//! Reusable test utilities:
//! - Mock ManagerITM server
//! - Configuration directories on disk
//! - Common test data

// Not every test binary uses every fixture
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_manager;
pub mod test_config;
pub mod test_data;

pub use mock_manager::MockManagerServer;
pub use test_config::TestConfigDir;
pub use test_data::*;
