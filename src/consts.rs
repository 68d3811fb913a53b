//! Project-wide constants.

use std::path::PathBuf;

/// Where Mailman 2 lives on most distributions.
pub const DEFAULT_ROOT: &str = "/usr/lib/mailman";

/// Interpreter used to run `withlist`.
pub const DEFAULT_PYTHON: &str = "/usr/bin/env python";

/// The MTA aliases file `newlist` asks you to edit.
pub const DEFAULT_ALIASES_PATH: &str = "/etc/aliases";

pub const DEFAULT_NEWALIASES_COMMAND: &str = "newaliases";

/// Module + function `withlist -r` calls inside the proxy directory.
pub const PROXY_CALLABLE: &str = "listproxy.command";

/// Appended to every command so the runner sees one combined stream.
pub const MERGE_STDERR: &str = "2>&1";

/// Default config path: `~/.mailmanager/config.json`.
/// Falls back to the working directory when there is no home.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".mailmanager")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_path_is_json_under_dot_dir() {
        let path = default_config_path();
        assert!(path.ends_with(".mailmanager/config.json"));
    }
}
