use async_trait::async_trait;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CommandOutput, Runner};

/// One call seen by [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub input: Option<String>,
}

/// A scripted runner for tests. Returns pre-defined outputs in order
/// and remembers every command it was asked to run.
pub struct ScriptedRunner {
    outputs: Vec<CommandOutput>,
    index: AtomicUsize,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new(outputs: Vec<CommandOutput>) -> Self {
        Self {
            outputs,
            index: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every output exits 0.
    pub fn succeeding<S: Into<String>>(outputs: impl IntoIterator<Item = S>) -> Self {
        Self::new(outputs.into_iter().map(|o| CommandOutput::new(o, 0)).collect())
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }
}

#[async_trait]
impl Runner for ScriptedRunner {
    async fn run(&self, command: &str, input: Option<&str>) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(Invocation {
            command: command.to_string(),
            input: input.map(str::to_string),
        });
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.outputs.get(i).cloned().ok_or_else(|| {
            io::Error::other(format!(
                "ScriptedRunner: no more outputs (called {} times)",
                i + 1
            ))
        })
    }
}
