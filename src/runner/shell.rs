use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, Runner};

/// Runs commands through `sh -c`, the way the Mailman tools expect to be called.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    timeout: Option<Duration>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the command if it has not exited after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    async fn spawn(command: &str, input: Option<&str>) -> io::Result<CommandOutput> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Feed stdin while the output pipes are drained, or a child that
        // writes before it finishes reading blocks on a full pipe.
        let writer = match (input, child.stdin.take()) {
            (Some(input), Some(mut stdin)) => {
                let input = input.to_string();
                Some(tokio::spawn(async move {
                    // A child that exits without reading stdin is not our failure.
                    match stdin.write_all(input.as_bytes()).await {
                        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
                        // Dropping stdin closes the pipe so the child sees EOF.
                        _ => Ok(()),
                    }
                }))
            }
            _ => None,
        };

        let output = child.wait_with_output().await?;

        if let Some(writer) = writer {
            writer.await.map_err(io::Error::other)??;
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            output: text,
            status: output.status.code().unwrap_or(-1),
        })
    }
}

#[async_trait]
impl Runner for ShellRunner {
    async fn run(&self, command: &str, input: Option<&str>) -> io::Result<CommandOutput> {
        debug!(command, stdin = input.is_some(), "running");

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, Self::spawn(command, input))
                .await
                .map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("timed out after {}s", limit.as_secs_f32()),
                    )
                })?,
            None => Self::spawn(command, input).await,
        }?;

        debug!(command, status = result.status, "finished");
        Ok(result)
    }
}
