//! Calls into a loaded `MailList` object through `withlist` and the list proxy.
//!
//! The proxy (`listproxy.command`) looks up the method or attribute named on
//! the command line, calls it with the remaining arguments and prints one JSON
//! envelope. The names it receives are the list object's own, so they come
//! from a fixed table rather than from transforming our operation names.

use super::CommandLine;
use crate::config::BridgeConfig;
use crate::consts::PROXY_CALLABLE;
use crate::escape::{escape, quote_if_needed};
use crate::list::ListName;

/// `withlist` flags for every proxy call. The list is loaded unlocked; the
/// proxy locks and saves around mutations itself, so `-l` is never passed.
const WITHLIST_FLAGS: &[&str] = &["-q", "-r"];

/// Whether a call only reads the list or changes it. Does not affect the
/// rendered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    Query,
    Write,
}

/// Every list-object call we make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyMethod {
    RegularMembers,
    DigestMembers,
    AddMember,
    ApprovedAddMember,
    DeleteMember,
    ApprovedDeleteMember,
    Moderators,
    AddModerator,
    DeleteModerator,
    Owners,
    WebPageUrl,
    Description,
    SetDescription,
    RequestEmail,
    SubjectPrefix,
    SetSubjectPrefix,
    HostName,
    SetHostName,
}

impl ProxyMethod {
    pub const ALL: &'static [ProxyMethod] = &[
        ProxyMethod::RegularMembers,
        ProxyMethod::DigestMembers,
        ProxyMethod::AddMember,
        ProxyMethod::ApprovedAddMember,
        ProxyMethod::DeleteMember,
        ProxyMethod::ApprovedDeleteMember,
        ProxyMethod::Moderators,
        ProxyMethod::AddModerator,
        ProxyMethod::DeleteModerator,
        ProxyMethod::Owners,
        ProxyMethod::WebPageUrl,
        ProxyMethod::Description,
        ProxyMethod::SetDescription,
        ProxyMethod::RequestEmail,
        ProxyMethod::SubjectPrefix,
        ProxyMethod::SetSubjectPrefix,
        ProxyMethod::HostName,
        ProxyMethod::SetHostName,
    ];

    /// Name of the facade operation, as used in logs.
    pub fn operation(self) -> &'static str {
        match self {
            ProxyMethod::RegularMembers => "regular_members",
            ProxyMethod::DigestMembers => "digest_members",
            ProxyMethod::AddMember => "add_member",
            ProxyMethod::ApprovedAddMember => "approved_add_member",
            ProxyMethod::DeleteMember => "delete_member",
            ProxyMethod::ApprovedDeleteMember => "approved_delete_member",
            ProxyMethod::Moderators => "moderators",
            ProxyMethod::AddModerator => "add_moderator",
            ProxyMethod::DeleteModerator => "delete_moderator",
            ProxyMethod::Owners => "owners",
            ProxyMethod::WebPageUrl => "web_page_url",
            ProxyMethod::Description => "description",
            ProxyMethod::SetDescription => "set_description",
            ProxyMethod::RequestEmail => "request_email",
            ProxyMethod::SubjectPrefix => "subject_prefix",
            ProxyMethod::SetSubjectPrefix => "set_subject_prefix",
            ProxyMethod::HostName => "host_name",
            ProxyMethod::SetHostName => "set_host_name",
        }
    }

    /// The token the proxy dispatches on.
    pub fn name(self) -> &'static str {
        match self {
            ProxyMethod::RegularMembers => "getRegularMemberKeys",
            ProxyMethod::DigestMembers => "getDigestMemberKeys",
            ProxyMethod::AddMember => "addMember",
            ProxyMethod::ApprovedAddMember => "approvedAddMember",
            ProxyMethod::DeleteMember => "deleteMember",
            ProxyMethod::ApprovedDeleteMember => "approvedDeleteMember",
            ProxyMethod::Moderators => "moderator",
            ProxyMethod::AddModerator => "moderator.append",
            ProxyMethod::DeleteModerator => "moderator.remove",
            ProxyMethod::Owners => "owner",
            ProxyMethod::WebPageUrl => "web_page_url",
            ProxyMethod::Description => "description",
            ProxyMethod::SetDescription => "description=",
            ProxyMethod::RequestEmail => "getRequestEmail",
            ProxyMethod::SubjectPrefix => "subject_prefix",
            ProxyMethod::SetSubjectPrefix => "subject_prefix=",
            ProxyMethod::HostName => "host_name",
            ProxyMethod::SetHostName => "host_name=",
        }
    }

    pub fn mode(self) -> ProxyMode {
        match self {
            ProxyMethod::RegularMembers
            | ProxyMethod::DigestMembers
            | ProxyMethod::Moderators
            | ProxyMethod::Owners
            | ProxyMethod::WebPageUrl
            | ProxyMethod::Description
            | ProxyMethod::RequestEmail
            | ProxyMethod::SubjectPrefix
            | ProxyMethod::HostName => ProxyMode::Query,
            ProxyMethod::AddMember
            | ProxyMethod::ApprovedAddMember
            | ProxyMethod::DeleteMember
            | ProxyMethod::ApprovedDeleteMember
            | ProxyMethod::AddModerator
            | ProxyMethod::DeleteModerator
            | ProxyMethod::SetDescription
            | ProxyMethod::SetSubjectPrefix
            | ProxyMethod::SetHostName => ProxyMode::Write,
        }
    }
}

/// `PYTHONPATH=<proxy_dir> <python> <root>/bin/withlist <flags> listproxy.command "<list>" <method> <args...>`
pub fn call(
    config: &BridgeConfig,
    list: &ListName,
    method: ProxyMethod,
    args: &[&str],
) -> CommandLine {
    let mut tokens = vec![
        format!(
            "PYTHONPATH={}",
            quote_if_needed(&config.proxy_dir.to_string_lossy())
        ),
        config.python.clone(),
        quote_if_needed(&config.bin("withlist").to_string_lossy()),
    ];
    tokens.extend(WITHLIST_FLAGS.iter().map(|f| f.to_string()));
    tokens.push(PROXY_CALLABLE.to_string());
    tokens.push(escape(list.as_str()));
    tokens.push(method.name().to_string());
    tokens.extend(args.iter().map(|a| escape(a)));
    CommandLine::new(tokens)
}
