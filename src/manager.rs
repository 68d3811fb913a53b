//! The public face of the crate: one method per list operation.
//!
//! Each call builds a fresh command, runs it, and decodes the result. Nothing
//! is cached between calls; Mailman's own files are the only state.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::aliases::AliasStore;
use crate::aliases::file::FileAliases;
use crate::command::proxy::{self, ProxyMethod};
use crate::command::{CommandLine, binary};
use crate::config::BridgeConfig;
use crate::error::{AliasStage, Error, Result};
use crate::list::{CreateListRequest, ListCreated, ListEntry, ListName};
use crate::response::{self, Envelope, Status};
use crate::runner::Runner;
use crate::runner::shell::ShellRunner;

pub struct MailManager {
    config: BridgeConfig,
    runner: Arc<dyn Runner>,
    aliases: Arc<dyn AliasStore>,
}

impl MailManager {
    pub fn new(config: BridgeConfig, runner: Arc<dyn Runner>, aliases: Arc<dyn AliasStore>) -> Self {
        Self {
            config,
            runner,
            aliases,
        }
    }

    /// Real shell, real aliases file, both taken from `config`.
    pub fn from_config(config: BridgeConfig) -> Self {
        let runner = match config.timeout() {
            Some(limit) => ShellRunner::with_timeout(limit),
            None => ShellRunner::new(),
        };
        let aliases = FileAliases::new(config.aliases_path.clone());
        Self::new(config, Arc::new(runner), Arc::new(aliases))
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    // --- Plumbing ---

    /// Run a command and insist on exit status 0.
    async fn execute(&self, command: &CommandLine) -> Result<String> {
        let line = command.render();
        debug!(command = %line, "executing");
        let out = self
            .runner
            .run(&line, command.input())
            .await
            .map_err(|source| Error::Spawn {
                command: line.clone(),
                source,
            })?;
        debug!(command = %line, status = out.status, "exited");
        response::check_exit(&line, out)
    }

    /// One list-proxy call, decoded but not judged.
    async fn proxy(&self, list: &ListName, method: ProxyMethod, args: &[&str]) -> Result<Envelope> {
        let command = proxy::call(&self.config, list, method, args);
        debug!(list = %list, operation = method.operation(), mode = ?method.mode(), "proxy call");
        let output = self.execute(&command).await?;
        Envelope::decode(&command.render(), &output)
    }

    async fn proxy_value<T: DeserializeOwned>(&self, list: &ListName, method: ProxyMethod) -> Result<T> {
        self.proxy(list, method, &[])
            .await?
            .into_return(method.name())
    }

    async fn proxy_write(&self, list: &ListName, method: ProxyMethod, args: &[&str]) -> Result<()> {
        self.proxy(list, method, args)
            .await?
            .into_success(method.name())?;
        Ok(())
    }

    // --- Site-wide ---

    /// Every list on the site, with its description.
    pub async fn lists(&self) -> Result<Vec<ListEntry>> {
        let output = self.execute(&binary::list_lists(&self.config, false)).await?;
        Ok(response::parse_list_lists(&output))
    }

    /// Just the names, from `list_lists -b`.
    pub async fn list_names(&self) -> Result<Vec<String>> {
        let output = self.execute(&binary::list_lists(&self.config, true)).await?;
        Ok(response::parse_bare_names(&output))
    }

    /// Create a list, then wire its aliases into the MTA.
    ///
    /// Nothing runs if a required field is missing. Once `newlist` has
    /// succeeded, any later failure (including output with no alias block) is
    /// an [`Error::PartialFailure`]: the list exists but mail to it will not
    /// route yet.
    pub async fn create_list(&self, request: &CreateListRequest) -> Result<ListCreated> {
        let new_list = request.validate()?;
        let command = binary::newlist(&self.config, &new_list);
        let output = self.execute(&command).await?;

        info!(list = new_list.name, "list created");

        let partial = |stage: AliasStage, source: Error| {
            warn!(list = new_list.name, %stage, error = %source, "list created without aliases");
            Error::PartialFailure {
                list: new_list.name.to_string(),
                stage,
                source: Box::new(source),
            }
        };

        let aliases = response::extract_aliases(&output).ok_or_else(|| {
            partial(
                AliasStage::Extract,
                Error::Protocol {
                    command: command.render(),
                    reason: "no alias block in newlist output".to_string(),
                },
            )
        })?;

        self.aliases
            .append(&aliases)
            .await
            .map_err(|e| partial(AliasStage::Append, e))?;
        self.execute(&binary::newaliases(&self.config))
            .await
            .map_err(|e| partial(AliasStage::Regenerate, e))?;
        info!(list = new_list.name, aliases = aliases.len(), "aliases installed");

        Ok(ListCreated {
            name: new_list.name.to_string(),
            aliases,
        })
    }

    /// Remove a list, optionally with its archives. Aliases are left alone.
    pub async fn delete_list(&self, list: &ListName, archives: bool) -> Result<()> {
        self.execute(&binary::rmlist(&self.config, list, archives)).await?;
        info!(list = %list, archives, "list removed");
        Ok(())
    }

    /// Post a raw RFC 822 message to the list as if it had arrived by mail.
    pub async fn inject(&self, list: &ListName, message: &str) -> Result<()> {
        self.execute(&binary::inject(&self.config, list, message)).await?;
        Ok(())
    }

    // --- Members ---

    pub async fn regular_members(&self, list: &ListName) -> Result<Vec<String>> {
        self.proxy_value(list, ProxyMethod::RegularMembers).await
    }

    pub async fn digest_members(&self, list: &ListName) -> Result<Vec<String>> {
        self.proxy_value(list, ProxyMethod::DigestMembers).await
    }

    /// Subscribe through the list's normal policy (confirmation, approval).
    pub async fn add_member(&self, list: &ListName, address: &str) -> Result<()> {
        self.proxy_write(list, ProxyMethod::AddMember, &[address]).await
    }

    /// Subscribe immediately, skipping confirmation and approval.
    pub async fn approved_add_member(&self, list: &ListName, address: &str) -> Result<()> {
        self.proxy_write(list, ProxyMethod::ApprovedAddMember, &[address])
            .await
    }

    pub async fn delete_member(&self, list: &ListName, address: &str) -> Result<()> {
        self.proxy_write(list, ProxyMethod::DeleteMember, &[address]).await
    }

    pub async fn approved_delete_member(&self, list: &ListName, address: &str) -> Result<()> {
        self.proxy_write(list, ProxyMethod::ApprovedDeleteMember, &[address])
            .await
    }

    // --- Moderators ---

    /// The raw envelope. Callers check [`Envelope::is_success`] themselves.
    pub async fn moderators(&self, list: &ListName) -> Result<Envelope> {
        self.proxy(list, ProxyMethod::Moderators, &[]).await
    }

    async fn current_moderators(&self, list: &ListName) -> Result<Vec<String>> {
        self.moderators(list)
            .await?
            .into_return(ProxyMethod::Moderators.name())
    }

    /// Add a moderator unless they already are one, in which case nothing is
    /// written and the result is `already_a_moderator`.
    pub async fn add_moderator(&self, list: &ListName, address: &str) -> Result<Envelope> {
        if self.current_moderators(list).await?.iter().any(|m| m == address) {
            warn!(list = %list, address, "already a moderator");
            return Ok(Envelope::status(Status::AlreadyAModerator));
        }
        self.moderator_change(list, ProxyMethod::AddModerator, address)
            .await
    }

    /// Remove a moderator if present; otherwise `not_a_moderator`, nothing written.
    pub async fn delete_moderator(&self, list: &ListName, address: &str) -> Result<Envelope> {
        if !self.current_moderators(list).await?.iter().any(|m| m == address) {
            warn!(list = %list, address, "not a moderator");
            return Ok(Envelope::status(Status::NotAModerator));
        }
        self.moderator_change(list, ProxyMethod::DeleteModerator, address)
            .await
    }

    async fn moderator_change(
        &self,
        list: &ListName,
        method: ProxyMethod,
        address: &str,
    ) -> Result<Envelope> {
        self.proxy(list, method, &[address])
            .await?
            .ensure_success(method.name())
    }

    pub async fn owners(&self, list: &ListName) -> Result<Vec<String>> {
        self.proxy_value(list, ProxyMethod::Owners).await
    }

    // --- Attributes ---

    pub async fn web_page_url(&self, list: &ListName) -> Result<String> {
        self.proxy_value(list, ProxyMethod::WebPageUrl).await
    }

    pub async fn description(&self, list: &ListName) -> Result<String> {
        self.proxy_value(list, ProxyMethod::Description).await
    }

    pub async fn set_description(&self, list: &ListName, description: &str) -> Result<()> {
        self.proxy_write(list, ProxyMethod::SetDescription, &[description])
            .await
    }

    /// The `<list>-request@<host>` address.
    pub async fn request_email(&self, list: &ListName) -> Result<String> {
        self.proxy_value(list, ProxyMethod::RequestEmail).await
    }

    pub async fn subject_prefix(&self, list: &ListName) -> Result<String> {
        self.proxy_value(list, ProxyMethod::SubjectPrefix).await
    }

    pub async fn set_subject_prefix(&self, list: &ListName, prefix: &str) -> Result<()> {
        self.proxy_write(list, ProxyMethod::SetSubjectPrefix, &[prefix])
            .await
    }

    pub async fn host_name(&self, list: &ListName) -> Result<String> {
        self.proxy_value(list, ProxyMethod::HostName).await
    }

    pub async fn set_host_name(&self, list: &ListName, host: &str) -> Result<()> {
        self.proxy_write(list, ProxyMethod::SetHostName, &[host]).await
    }
}
