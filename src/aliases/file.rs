use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::AliasStore;
use crate::error::{Error, Result};

/// An aliases file on disk, opened in append mode for every write.
#[derive(Debug, Clone)]
pub struct FileAliases {
    path: PathBuf,
}

impl FileAliases {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl AliasStore for FileAliases {
    async fn append(&self, lines: &[String]) -> Result<()> {
        let mut block = String::new();
        for line in lines {
            block.push_str(line);
            block.push('\n');
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(block.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), lines = lines.len(), "appended aliases");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases");
        std::fs::write(&path, "postmaster: root\n").unwrap();

        let aliases = FileAliases::new(&path);
        aliases
            .append(&["## foo mailing list".to_string(), "foo: \"|mailman post foo\"".to_string()])
            .await
            .unwrap();
        aliases.append(&["bar: \"|mailman post bar\"".to_string()]).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "postmaster: root\n## foo mailing list\nfoo: \"|mailman post foo\"\nbar: \"|mailman post bar\"\n"
        );
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let aliases = FileAliases::new(dir.path().join("no/such/dir/aliases"));
        let err = aliases.append(&["x".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("aliases"));
    }
}
