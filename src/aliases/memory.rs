use async_trait::async_trait;
use std::sync::Mutex;

use super::AliasStore;
use crate::error::{Error, Result};

/// In-memory aliases for tests. Can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryAliases {
    lines: Mutex<Vec<String>>,
    appends: Mutex<usize>,
    fail: bool,
}

impl MemoryAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every append fails with a permission error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Number of append calls, failed ones included.
    pub fn appends(&self) -> usize {
        *self.appends.lock().unwrap()
    }
}

#[async_trait]
impl AliasStore for MemoryAliases {
    async fn append(&self, lines: &[String]) -> Result<()> {
        *self.appends.lock().unwrap() += 1;
        if self.fail {
            return Err(Error::Io {
                path: "memory".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        self.lines.lock().unwrap().extend_from_slice(lines);
        Ok(())
    }
}
