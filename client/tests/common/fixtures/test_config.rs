//! Temporary configuration directories

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temp directory holding a `main.toml`
pub struct TestConfigDir {
    dir: TempDir,
}

impl TestConfigDir {
    pub fn with_main_toml(content: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("main.toml"), content).expect("Failed to write main.toml");
        Self { dir }
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
