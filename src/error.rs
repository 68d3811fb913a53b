use std::fmt;
use std::path::PathBuf;

/// Text Mailman's `LockFile` prints when a list lock could not be taken in time.
const LOCK_TIMEOUT_MARKERS: &[&str] = &["TimeOutError", "NotLockedError"];

pub type Result<T> = std::result::Result<T, Error>;

/// Which step of alias provisioning broke after `newlist` succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasStage {
    /// `newlist` printed no alias block to install.
    Extract,
    Append,
    Regenerate,
}

impl fmt::Display for AliasStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasStage::Extract => write!(f, "aliases extraction"),
            AliasStage::Append => write!(f, "aliases append"),
            AliasStage::Regenerate => write!(f, "aliases regeneration"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected before anything ran.
    #[error("invalid request: {0}")]
    Configuration(String),

    /// The command ran and exited non-zero.
    #[error("`{command}` exited with status {status}")]
    Execution {
        command: String,
        status: i32,
        output: String,
    },

    /// The command could not be started, or did not finish in time.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited cleanly but its output was not what we expect.
    #[error("unexpected output from `{command}`: {reason}")]
    Protocol { command: String, reason: String },

    /// The list proxy answered with a non-success result.
    #[error("{method} failed with `{status}`{}", detail_suffix(.detail))]
    OperationFailed {
        method: String,
        status: String,
        detail: Option<String>,
    },

    /// `newlist` created the list but the aliases were not provisioned.
    /// The list exists; mail to it will not route until this is fixed.
    #[error("list `{list}` was created but {stage} failed: {source}")]
    PartialFailure {
        list: String,
        stage: AliasStage,
        #[source]
        source: Box<Error>,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl Error {
    /// Non-zero exit, or no exit at all.
    pub fn is_execution(&self) -> bool {
        matches!(self, Error::Execution { .. } | Error::Spawn { .. })
    }

    /// The engine gave up waiting for a list lock. Worth retrying later.
    pub fn is_lock_contention(&self) -> bool {
        let text = match self {
            Error::Execution { output, .. } => output.as_str(),
            Error::OperationFailed {
                detail: Some(detail),
                ..
            } => detail.as_str(),
            Error::PartialFailure { source, .. } => return source.is_lock_contention(),
            _ => return false,
        };
        LOCK_TIMEOUT_MARKERS.iter().any(|m| text.contains(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_failed_includes_detail() {
        let err = Error::OperationFailed {
            method: "addMember".to_string(),
            status: "failure".to_string(),
            detail: Some("MMAlreadyAMember".to_string()),
        };
        assert_eq!(err.to_string(), "addMember failed with `failure`: MMAlreadyAMember");
    }

    #[test]
    fn operation_failed_without_detail() {
        let err = Error::OperationFailed {
            method: "moderator".to_string(),
            status: "failure".to_string(),
            detail: None,
        };
        assert_eq!(err.to_string(), "moderator failed with `failure`");
    }

    #[test]
    fn lock_timeout_in_output_is_contention() {
        let err = Error::Execution {
            command: "withlist".to_string(),
            status: 1,
            output: "Mailman.LockFile.TimeOutError".to_string(),
        };
        assert!(err.is_lock_contention());
        assert!(err.is_execution());
    }

    #[test]
    fn plain_failure_is_not_contention() {
        let err = Error::Execution {
            command: "withlist".to_string(),
            status: 1,
            output: "No such list".to_string(),
        };
        assert!(!err.is_lock_contention());
        assert!(!Error::Configuration("name".to_string()).is_execution());
    }

    #[test]
    fn partial_failure_names_list_and_stage() {
        let err = Error::PartialFailure {
            list: "foo".to_string(),
            stage: AliasStage::Regenerate,
            source: Box::new(Error::Execution {
                command: "newaliases 2>&1".to_string(),
                status: 75,
                output: String::new(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("`foo`"));
        assert!(msg.contains("aliases regeneration"));
    }

    #[test]
    fn missing_alias_block_is_an_extraction_stage() {
        let err = Error::PartialFailure {
            list: "foo".to_string(),
            stage: AliasStage::Extract,
            source: Box::new(Error::Protocol {
                command: "newlist 2>&1".to_string(),
                reason: "no alias block in newlist output".to_string(),
            }),
        };
        assert!(err.to_string().contains("aliases extraction"));
    }
}
