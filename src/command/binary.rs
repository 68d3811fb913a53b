//! Mailman's standalone tools under `<root>/bin`.

use super::CommandLine;
use crate::config::BridgeConfig;
use crate::escape::{escape, quote_if_needed};
use crate::list::{ListName, NewList};

fn tool(config: &BridgeConfig, name: &str) -> String {
    quote_if_needed(&config.bin(name).to_string_lossy())
}

/// `list_lists`, or `list_lists -b` for bare names.
pub fn list_lists(config: &BridgeConfig, bare: bool) -> CommandLine {
    let mut tokens = vec![tool(config, "list_lists")];
    if bare {
        tokens.push("-b".to_string());
    }
    CommandLine::new(tokens)
}

/// `newlist -q [options] "<name>" "<admin>" "<password>"`.
/// `-q` stops newlist from prompting and from mailing the admin.
pub fn newlist(config: &BridgeConfig, list: &NewList<'_>) -> CommandLine {
    let mut tokens = vec![tool(config, "newlist"), "-q".to_string()];
    if let Some(host) = list.url_host {
        tokens.push(format!("--urlhost={}", escape(host)));
    }
    if let Some(host) = list.email_host {
        tokens.push(format!("--emailhost={}", escape(host)));
    }
    if let Some(language) = list.language {
        tokens.push("-l".to_string());
        tokens.push(escape(language));
    }
    tokens.push(escape(list.name));
    tokens.push(escape(list.admin_email));
    tokens.push(escape(list.admin_password));
    CommandLine::new(tokens)
}

/// `rmlist [-a] "<name>"`. `-a` also drops the archives.
pub fn rmlist(config: &BridgeConfig, list: &ListName, archives: bool) -> CommandLine {
    let mut tokens = vec![tool(config, "rmlist")];
    if archives {
        tokens.push("-a".to_string());
    }
    tokens.push(escape(list.as_str()));
    CommandLine::new(tokens)
}

/// `inject -l "<name>"`, message on stdin.
pub fn inject(config: &BridgeConfig, list: &ListName, message: &str) -> CommandLine {
    CommandLine::new(vec![
        tool(config, "inject"),
        "-l".to_string(),
        escape(list.as_str()),
    ])
    .with_input(message)
}

/// The MTA's alias rebuild command, taken verbatim from config.
pub fn newaliases(config: &BridgeConfig) -> CommandLine {
    CommandLine::new(vec![config.newaliases_command.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::CreateListRequest;

    fn config() -> BridgeConfig {
        BridgeConfig::with_root("/foo/bar")
    }

    #[test]
    fn list_lists_line() {
        assert_eq!(list_lists(&config(), false).render(), "/foo/bar/bin/list_lists 2>&1");
        assert_eq!(list_lists(&config(), true).render(), "/foo/bar/bin/list_lists -b 2>&1");
    }

    #[test]
    fn newlist_line_quotes_positionals() {
        let req = CreateListRequest::new("foo", "foo@bar.baz", "qux");
        let cmd = newlist(&config(), &req.validate().unwrap());
        assert_eq!(
            cmd.render(),
            "/foo/bar/bin/newlist -q \"foo\" \"foo@bar.baz\" \"qux\" 2>&1"
        );
    }

    #[test]
    fn newlist_options_come_before_positionals() {
        let req = CreateListRequest {
            url_host: Some("www.bar.baz".to_string()),
            email_host: Some("bar.baz".to_string()),
            language: Some("de".to_string()),
            ..CreateListRequest::new("foo", "foo@bar.baz", "p$ss")
        };
        let cmd = newlist(&config(), &req.validate().unwrap());
        assert_eq!(
            cmd.render(),
            "/foo/bar/bin/newlist -q --urlhost=\"www.bar.baz\" --emailhost=\"bar.baz\" \
             -l \"de\" \"foo\" \"foo@bar.baz\" \"p\\$ss\" 2>&1"
        );
    }

    #[test]
    fn rmlist_with_and_without_archives() {
        let foo = ListName::new("foo").unwrap();
        assert_eq!(rmlist(&config(), &foo, false).render(), "/foo/bar/bin/rmlist \"foo\" 2>&1");
        assert_eq!(rmlist(&config(), &foo, true).render(), "/foo/bar/bin/rmlist -a \"foo\" 2>&1");
    }

    #[test]
    fn inject_carries_message_as_input() {
        let foo = ListName::new("foo").unwrap();
        let cmd = inject(&config(), &foo, "Subject: hi\n\nbody\n");
        assert_eq!(cmd.render(), "/foo/bar/bin/inject -l \"foo\" 2>&1");
        assert_eq!(cmd.input(), Some("Subject: hi\n\nbody\n"));
    }

    #[test]
    fn root_with_spaces_is_quoted() {
        let config = BridgeConfig::with_root("/opt/mail man");
        assert_eq!(
            list_lists(&config, false).render(),
            "\"/opt/mail man/bin/list_lists\" 2>&1"
        );
    }
}
