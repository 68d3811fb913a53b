use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mailmanager::MailManager;
use mailmanager::config::BridgeConfig;
use mailmanager::consts::default_config_path;
use mailmanager::list::{CreateListRequest, ListName};

#[derive(Parser)]
#[command(name = "mailmanager", version, about = "Manage Mailman lists from the command line.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (JSON). Defaults to ~/.mailmanager/config.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mailman installation prefix, overrides the config file
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Aliases file, overrides the config file
    #[arg(long)]
    aliases: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List every mailing list with its description
    Lists {
        /// Names only
        #[arg(short, long, default_value_t = false)]
        bare: bool,
    },
    /// Create a list and install its aliases
    Create {
        name: String,
        admin_email: String,
        admin_password: String,
        #[arg(long)]
        url_host: Option<String>,
        #[arg(long)]
        email_host: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
    /// Remove a list
    Remove {
        list: String,
        /// Also delete the archives
        #[arg(short, long, default_value_t = false)]
        archives: bool,
    },
    /// Show regular (or digest) members
    Members {
        list: String,
        #[arg(short, long, default_value_t = false)]
        digest: bool,
    },
    /// Subscribe an address
    Subscribe {
        list: String,
        address: String,
        /// Skip confirmation and moderator approval
        #[arg(short, long, default_value_t = false)]
        approved: bool,
    },
    /// Unsubscribe an address
    Unsubscribe {
        list: String,
        address: String,
        #[arg(short, long, default_value_t = false)]
        approved: bool,
    },
    /// Show moderators
    Moderators { list: String },
    AddModerator { list: String, address: String },
    RemoveModerator { list: String, address: String },
    /// Show owners
    Owners { list: String },
    /// Show descriptive attributes of a list
    Info { list: String },
    /// Set the list description
    SetDescription { list: String, description: String },
    SetSubjectPrefix { list: String, prefix: String },
    SetHostName { list: String, host: String },
    /// Post a message read from stdin to a list
    Inject { list: String },
}

#[derive(Serialize)]
struct ListInfo {
    description: String,
    web_page_url: String,
    request_email: String,
    subject_prefix: String,
    host_name: String,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_name(name: String) -> anyhow::Result<ListName> {
    ListName::new(name).context("bad list name")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut config = BridgeConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(aliases) = cli.aliases {
        config.aliases_path = aliases;
    }

    let manager = MailManager::from_config(config);

    match cli.command {
        Command::Lists { bare: true } => print_json(&manager.list_names().await?)?,
        Command::Lists { bare: false } => print_json(&manager.lists().await?)?,
        Command::Create {
            name,
            admin_email,
            admin_password,
            url_host,
            email_host,
            language,
        } => {
            let request = CreateListRequest {
                url_host,
                email_host,
                language,
                ..CreateListRequest::new(name, admin_email, admin_password)
            };
            print_json(&manager.create_list(&request).await?)?;
        }
        Command::Remove { list, archives } => {
            manager.delete_list(&list_name(list)?, archives).await?;
        }
        Command::Members { list, digest } => {
            let list = list_name(list)?;
            let members = if digest {
                manager.digest_members(&list).await?
            } else {
                manager.regular_members(&list).await?
            };
            print_json(&members)?;
        }
        Command::Subscribe {
            list,
            address,
            approved,
        } => {
            let list = list_name(list)?;
            if approved {
                manager.approved_add_member(&list, &address).await?;
            } else {
                manager.add_member(&list, &address).await?;
            }
        }
        Command::Unsubscribe {
            list,
            address,
            approved,
        } => {
            let list = list_name(list)?;
            if approved {
                manager.approved_delete_member(&list, &address).await?;
            } else {
                manager.delete_member(&list, &address).await?;
            }
        }
        Command::Moderators { list } => {
            let envelope = manager.moderators(&list_name(list)?).await?;
            print_json(&envelope)?;
            if !envelope.is_success() {
                std::process::exit(1);
            }
        }
        Command::AddModerator { list, address } => {
            print_json(&manager.add_moderator(&list_name(list)?, &address).await?)?;
        }
        Command::RemoveModerator { list, address } => {
            print_json(&manager.delete_moderator(&list_name(list)?, &address).await?)?;
        }
        Command::Owners { list } => print_json(&manager.owners(&list_name(list)?).await?)?,
        Command::Info { list } => {
            let list = list_name(list)?;
            print_json(&ListInfo {
                description: manager.description(&list).await?,
                web_page_url: manager.web_page_url(&list).await?,
                request_email: manager.request_email(&list).await?,
                subject_prefix: manager.subject_prefix(&list).await?,
                host_name: manager.host_name(&list).await?,
            })?;
        }
        Command::SetDescription { list, description } => {
            manager.set_description(&list_name(list)?, &description).await?;
        }
        Command::SetSubjectPrefix { list, prefix } => {
            manager.set_subject_prefix(&list_name(list)?, &prefix).await?;
        }
        Command::SetHostName { list, host } => {
            manager.set_host_name(&list_name(list)?, &host).await?;
        }
        Command::Inject { list } => {
            let list = list_name(list)?;
            let mut message = String::new();
            std::io::stdin()
                .read_to_string(&mut message)
                .context("failed to read message from stdin")?;
            manager.inject(&list, &message).await?;
        }
    }

    Ok(())
}
