//! Decoding what the Mailman tools print.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};
use crate::list::ListEntry;
use crate::runner::CommandOutput;

/// What `list_lists` prints for a list with no description.
const NO_DESCRIPTION: &str = "[no description available]";

/// `newlist` starts the alias block with `## <name> mailing list`.
const ALIAS_HEADER_PREFIX: &str = "## ";

/// The `result` tag of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Success,
    Failure,
    AlreadyAModerator,
    NotAModerator,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::AlreadyAModerator => "already_a_moderator",
            Status::NotAModerator => "not_a_moderator",
            Status::Other(s) => s,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "success" => Status::Success,
            "failure" => Status::Failure,
            "already_a_moderator" => Status::AlreadyAModerator,
            "not_a_moderator" => Status::NotAModerator,
            _ => Status::Other(s),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The JSON line the list proxy prints: `{"result": ..., "return": ..., "error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub result: Status,
    /// `null` when the proxy returned nothing.
    #[serde(rename = "return", default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// An envelope with just a status, as produced locally for no-op moderator changes.
    pub fn status(result: Status) -> Self {
        Self {
            result,
            value: Value::Null,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == Status::Success
    }

    /// Parse the last non-blank line of `output`. Anything before it is
    /// interpreter noise.
    pub fn decode(command: &str, output: &str) -> Result<Self> {
        let line = output
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| Error::Protocol {
                command: command.to_string(),
                reason: "no output".to_string(),
            })?;
        serde_json::from_str(line).map_err(|e| Error::Protocol {
            command: command.to_string(),
            reason: format!("not a JSON envelope ({e}): {line}"),
        })
    }

    /// Turn a non-success envelope into [`Error::OperationFailed`].
    pub fn ensure_success(self, method: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::OperationFailed {
                method: method.to_string(),
                status: self.result.to_string(),
                detail: self.error,
            })
        }
    }

    pub fn into_success(self, method: &str) -> Result<Value> {
        Ok(self.ensure_success(method)?.value)
    }

    /// Success payload decoded into `T`.
    pub fn into_return<T: DeserializeOwned>(self, method: &str) -> Result<T> {
        let value = self.into_success(method)?;
        serde_json::from_value(value).map_err(|e| Error::Protocol {
            command: method.to_string(),
            reason: format!("unexpected return value: {e}"),
        })
    }
}

/// Non-zero exit always wins over whatever was printed.
pub fn check_exit(command: &str, out: CommandOutput) -> Result<String> {
    if out.success() {
        Ok(out.output)
    } else {
        Err(Error::Execution {
            command: command.to_string(),
            status: out.status,
            output: out.output,
        })
    }
}

/// Rows of `list_lists`: `<name> - <description>`, name right-aligned.
/// The `N matching mailing lists found:` header has no ` - ` and is skipped.
pub fn parse_list_lists(output: &str) -> Vec<ListEntry> {
    output
        .lines()
        .filter_map(|line| {
            let (name, description) = line.trim().split_once(" - ")?;
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return None;
            }
            let description = description.trim();
            Some(ListEntry {
                name: name.to_string(),
                description: if description == NO_DESCRIPTION {
                    String::new()
                } else {
                    description.to_string()
                },
            })
        })
        .collect()
}

/// `list_lists -b`: one name per line.
pub fn parse_bare_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// The alias block `newlist` asks you to paste into the aliases file,
/// from the `## <name> mailing list` header to the end, right-trimmed.
/// `None` when the header is not there.
pub fn extract_aliases(output: &str) -> Option<Vec<String>> {
    let mut lines = output.lines().map(str::trim_end);
    lines.find(|l| l.starts_with(ALIAS_HEADER_PREFIX)).map(|header| {
        std::iter::once(header)
            .chain(lines.filter(|l| !l.is_empty()))
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LIST_LISTS: &str = "3 matching mailing lists found:
        Foo - [no description available]
     BarBar - Dummy list
    Mailman - Mailman site list
";

    #[test]
    fn list_lists_yields_one_entry_per_row() {
        let lists = parse_list_lists(LIST_LISTS);
        assert_eq!(lists.len(), 3);
        assert_eq!(lists[0], ListEntry { name: "Foo".into(), description: String::new() });
        assert_eq!(lists[1].name, "BarBar");
        assert_eq!(lists[1].description, "Dummy list");
        assert_eq!(lists[2].description, "Mailman site list");
    }

    #[test]
    fn list_lists_handles_tab_indent_and_dashes_in_description() {
        let out = "2 matching mailing lists found:\n\tFoo - [no description available]\n\tBar - one - two\n";
        let lists = parse_list_lists(out);
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[1].description, "one - two");
    }

    #[test]
    fn list_lists_with_no_lists() {
        assert!(parse_list_lists("0 matching mailing lists found:\n").is_empty());
    }

    #[test]
    fn bare_names_skip_blank_lines() {
        assert_eq!(parse_bare_names("foo\nmailman\n\n"), vec!["foo", "mailman"]);
    }

    #[test]
    fn envelope_ignores_leading_noise() {
        let out = "Loading list foo (unlocked)\nImporting listproxy...\n{\"result\": \"success\", \"return\": [\"a@b.c\"]}\n";
        let env = Envelope::decode("cmd", out).unwrap();
        assert!(env.is_success());
        assert_eq!(env.value, json!(["a@b.c"]));
    }

    #[test]
    fn envelope_round_trips_any_return_value() {
        for value in [
            json!("foo-request@bar.com"),
            json!(42),
            json!(1.5),
            json!(["me@here.com", "you@there.org"]),
            json!({"nested": {"k": [1, 2]}}),
            json!(true),
            Value::Null,
        ] {
            let line = json!({"result": "success", "return": value}).to_string();
            let env = Envelope::decode("cmd", &line).unwrap();
            assert_eq!(env.value, value);
        }
    }

    #[test]
    fn absent_return_serializes_without_key() {
        let env = Envelope::status(Status::AlreadyAModerator);
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"result": "already_a_moderator"})
        );
    }

    #[test]
    fn unknown_status_is_preserved() {
        let env = Envelope::decode("cmd", r#"{"result": "locked"}"#).unwrap();
        assert_eq!(env.result, Status::Other("locked".to_string()));
        assert_eq!(env.result.to_string(), "locked");
    }

    #[test]
    fn failure_becomes_operation_failed_with_detail() {
        let env = Envelope::decode(
            "cmd",
            r#"{"result": "failure", "error": "MMAlreadyAMember"}"#,
        )
        .unwrap();
        match env.into_success("addMember") {
            Err(Error::OperationFailed { method, status, detail }) => {
                assert_eq!(method, "addMember");
                assert_eq!(status, "failure");
                assert_eq!(detail.as_deref(), Some("MMAlreadyAMember"));
            }
            other => panic!("expected OperationFailed, got {other:?}"),
        }
    }

    #[test]
    fn empty_or_garbage_output_is_a_protocol_error() {
        assert!(matches!(Envelope::decode("cmd", "\n\n"), Err(Error::Protocol { .. })));
        assert!(matches!(
            Envelope::decode("cmd", "Traceback (most recent call last):\n  oops"),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn wrong_return_type_is_a_protocol_error() {
        let env = Envelope::decode("cmd", r#"{"result": "success", "return": 7}"#).unwrap();
        assert!(matches!(
            env.into_return::<Vec<String>>("getRegularMemberKeys"),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn non_zero_exit_is_execution_error_even_with_json() {
        let out = CommandOutput::new(r#"{"result": "success"}"#, 1);
        assert!(matches!(check_exit("cmd", out), Err(Error::Execution { status: 1, .. })));
    }

    #[test]
    fn aliases_start_at_header_and_drop_padding() {
        let out = "To finish creating your mailing list, you must edit your /etc/aliases (or     \n\
                   `newaliases' program:            \n\
                   \n\
                   ## foo mailing list              \n\
                   foo:              \"|/foo/bar/mail/mailman post foo\"\n\
                   foo-admin:        \"|/foo/bar/mail/mailman admin foo\"";
        let aliases = extract_aliases(out).unwrap();
        assert_eq!(
            aliases,
            vec![
                "## foo mailing list",
                "foo:              \"|/foo/bar/mail/mailman post foo\"",
                "foo-admin:        \"|/foo/bar/mail/mailman admin foo\"",
            ]
        );
    }

    #[test]
    fn aliases_missing_header() {
        assert_eq!(extract_aliases("Create a new, unpopulated mailing list.\n"), None);
    }
}
