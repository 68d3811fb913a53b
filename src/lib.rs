//! Drive a Mailman list server through its command-line tools.
//!
//! Every operation renders a shell command line, hands it to a [`Runner`],
//! and decodes what comes back: free text from the standalone binaries,
//! or a one-line JSON [`Envelope`] from the `withlist` list proxy.

pub mod aliases;
pub mod command;
pub mod config;
pub mod consts;
pub mod error;
pub mod escape;
pub mod list;
pub mod manager;
pub mod response;
pub mod runner;

pub use error::{Error, Result};
pub use manager::MailManager;
pub use response::{Envelope, Status};
pub use runner::Runner;
