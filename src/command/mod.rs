//! Rendering of the shell command lines sent to a [`Runner`](crate::Runner).

pub mod binary;
pub mod proxy;

use std::fmt;

use crate::consts::MERGE_STDERR;

/// A command ready to run: already-escaped tokens plus optional stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
    input: Option<String>,
}

impl CommandLine {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            input: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Space-joined tokens with stderr folded into stdout.
    pub fn render(&self) -> String {
        format!("{} {MERGE_STDERR}", self.tokens.join(" "))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
