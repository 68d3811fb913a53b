//! The MTA aliases file new lists are routed through.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

/// Somewhere alias lines can be appended. Never truncated or rewritten.
#[async_trait]
pub trait AliasStore: Send + Sync {
    async fn append(&self, lines: &[String]) -> Result<()>;
}
