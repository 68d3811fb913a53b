pub mod mock;
pub mod shell;

use async_trait::async_trait;

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// stdout and stderr, in that order.
    pub output: String,
    /// Exit status. `-1` when the process was killed by a signal.
    pub status: i32,
}

impl CommandOutput {
    pub fn new(output: impl Into<String>, status: i32) -> Self {
        Self {
            output: output.into(),
            status,
        }
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs one complete shell command line. Could be a real shell or a test script.
#[async_trait]
pub trait Runner: Send + Sync {
    /// `input`, when present, is written to the command's stdin.
    async fn run(&self, command: &str, input: Option<&str>) -> std::io::Result<CommandOutput>;
}
