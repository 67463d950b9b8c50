
use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

pub(crate) const MINIMAL_JSON: &str = r#"{ "srcds_path": "/opt/srcds/srcds_linux" }"#;

/// Write a settings document into a fresh temp directory
pub(crate) fn write_config(filename: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(filename);
    std::fs::write(&path, contents).unwrap();
    (temp, path)
}
