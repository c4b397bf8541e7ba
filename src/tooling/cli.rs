//! CLI Tooling
//!
//! Command-line front end over the store and dispatcher. Every command starts
//! with a refresh, the way the dashboard fetches on mount, then renders from
//! the store's snapshot.

use crate::config::{ConfigLoader, DashConfig};
use crate::dispatch::{Dispatcher, IntentOutcome};
use crate::error::ApiError;
use crate::logging::init_logging;
use crate::remote::{DirectoryClient, HttpDirectoryClient, InMemoryDirectory};
use crate::store::{Applied, Settlement, UserStore};
use crate::types::{validate_draft, Address, Company, UserDraft, UserId, UserRecord};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Userdash CLI - user directory dashboard
#[derive(Parser, Debug)]
#[command(name = "userdash")]
#[command(about = "Browse and edit a remote user directory with local fallback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the bundled in-memory directory instead of the remote API
    #[arg(long, global = true)]
    pub offline: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List users, optionally filtered by status tag
    List {
        /// Status tag to filter by, or "all"
        #[arg(long, default_value = "all")]
        status: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show aggregate counts
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one user
    Show {
        id: UserId,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a user
    Create {
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Update a user; unspecified fields keep their current value
    Update {
        id: UserId,
        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Delete a user
    Delete {
        id: UserId,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Record fields accepted by create and update
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub suite: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub zipcode: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

impl DraftArgs {
    fn has_address(&self) -> bool {
        self.street.is_some() || self.suite.is_some() || self.city.is_some() || self.zipcode.is_some()
    }

    fn overlay_address(&self, base: Address) -> Address {
        Address {
            street: self.street.clone().unwrap_or(base.street),
            suite: self.suite.clone().unwrap_or(base.suite),
            city: self.city.clone().unwrap_or(base.city),
            zipcode: self.zipcode.clone().unwrap_or(base.zipcode),
        }
    }

    /// Draft for a new record
    pub fn to_create_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            username: None,
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            company: self.company.clone().map(|name| Company { name }),
            address: self
                .has_address()
                .then(|| self.overlay_address(Address::default())),
            status: self.status.clone(),
        }
    }

    /// Draft pre-filled from `current` with the given fields overlaid
    pub fn to_update_draft(&self, current: &UserRecord) -> UserDraft {
        let mut draft = UserDraft::from(current);
        let overlay = self.to_create_draft();
        if let Some(name) = overlay.name {
            draft.name = Some(name);
        }
        if let Some(email) = overlay.email {
            draft.email = Some(email);
        }
        if overlay.phone.is_some() {
            draft.phone = overlay.phone;
        }
        if overlay.website.is_some() {
            draft.website = overlay.website;
        }
        if overlay.company.is_some() {
            draft.company = overlay.company;
        }
        if self.has_address() {
            draft.address = Some(self.overlay_address(current.address.clone().unwrap_or_default()));
        }
        if overlay.status.is_some() {
            draft.status = overlay.status;
        }
        draft
    }
}

/// CLI context owning the runtime, the store and the dispatcher
pub struct CliContext {
    dispatcher: Dispatcher,
    config: DashConfig,
    runtime: tokio::runtime::Runtime,
}

impl CliContext {
    /// Create a context over an explicit directory client
    pub fn new(config: DashConfig, remote: Arc<dyn DirectoryClient>) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create runtime: {}", e)))?;
        Ok(Self {
            dispatcher: Dispatcher::new(UserStore::new(), remote),
            config,
            runtime,
        })
    }

    /// Load configuration, initialize logging and pick the directory client.
    pub fn from_cli(cli: &Cli) -> Result<Self, ApiError> {
        let mut config = match &cli.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(level) = &cli.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &cli.log_file {
            config.logging.file = Some(file.clone());
        }
        init_logging(Some(&config.logging))?;

        let remote: Arc<dyn DirectoryClient> = if cli.offline {
            info!("Using bundled in-memory directory");
            Arc::new(InMemoryDirectory::sample())
        } else {
            config.remote.validate()?;
            Arc::new(HttpDirectoryClient::from_config(&config.remote)?)
        };
        Self::new(config, remote)
    }

    pub fn store(&self) -> &UserStore {
        self.dispatcher.store()
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        if let Commands::Config = command {
            return self.config.to_toml();
        }
        if let Commands::Delete { id, force: false } = command {
            if !confirm_delete(*id)? {
                return Ok("Deletion cancelled".to_string());
            }
        }

        self.runtime.block_on(async {
            self.dispatcher.refresh().await;
            let body = self.execute_inner(command).await?;
            Ok(match self.error_banner() {
                Some(banner) => format!("{}\n{}", banner, body),
                None => body,
            })
        })
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        let store = self.store();
        match command {
            Commands::List { status, format } => {
                let view = store.filtered_by(status.as_str());
                if format == "json" {
                    to_json(&view.to_vec())
                } else {
                    Ok(format_user_table(view.iter()))
                }
            }
            Commands::Stats { format } => {
                let stats = store.aggregate_stats();
                if format == "json" {
                    to_json(&stats)
                } else {
                    Ok(format!(
                        "Total users: {}\nActive: {}\nPending: {}\nCompanies: {}",
                        stats.total, stats.active, stats.pending, stats.distinct_companies
                    ))
                }
            }
            Commands::Show { id, format } => {
                let user = store.user(*id).ok_or(ApiError::UserNotFound(*id))?;
                if format == "json" {
                    to_json(&user)
                } else {
                    Ok(format_user_details(&user))
                }
            }
            Commands::Create { fields } => {
                let draft = fields.to_create_draft();
                validate_draft(&draft).map_err(ApiError::InvalidDraft)?;
                store.clear_selection();
                let outcome = self.dispatcher.create_intent(draft).await;
                Ok(self.with_table(describe_outcome(&outcome)))
            }
            Commands::Update { id, fields } => {
                let current = store.user(*id).ok_or(ApiError::UserNotFound(*id))?;
                store.select(Some(&current));
                let draft = fields.to_update_draft(&current);
                if let Err(e) = validate_draft(&draft) {
                    store.clear_selection();
                    return Err(ApiError::InvalidDraft(e));
                }
                let outcome = self.dispatcher.update_intent(*id, draft).await;
                store.clear_selection();
                Ok(self.with_table(describe_outcome(&outcome)))
            }
            Commands::Delete { id, .. } => {
                let outcome = self.dispatcher.delete_intent(*id).await;
                Ok(self.with_table(describe_outcome(&outcome)))
            }
            Commands::Config => self.config.to_toml(),
        }
    }

    fn with_table(&self, summary: String) -> String {
        let users = self.store().users();
        format!("{}\n{}", summary, format_user_table(users.iter()))
    }

    fn error_banner(&self) -> Option<String> {
        self.store().last_error().map(|error| {
            format!(
                "{} {} (run the command again to retry)",
                "Error:".red().bold(),
                error
            )
        })
    }
}

fn confirm_delete(id: UserId) -> Result<bool, ApiError> {
    use dialoguer::Confirm;
    Confirm::new()
        .with_prompt(format!("Are you sure you want to delete user {}?", id))
        .default(false)
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render JSON: {}", e)))
}

/// One-line summary of a settled mutation intent
pub fn describe_outcome(outcome: &IntentOutcome) -> String {
    let action = match outcome.applied {
        Applied::Appended { id } => format!("Created user {}", id),
        Applied::Merged { id } => format!("Updated user {}", id),
        Applied::Removed { id } => format!("Deleted user {}", id),
        Applied::Missing { id } => format!("No user with id {}; nothing changed", id),
        Applied::Replaced { count } => format!("Loaded {} users", count),
        Applied::Unchanged => format!("{} left the collection unchanged", outcome.kind),
    };
    match &outcome.settlement {
        Settlement::Confirmed => format!("{} (confirmed by remote)", action),
        Settlement::Fallback { error } => format!("{} (applied locally: {})", action, error),
    }
}

fn format_user_table<'a>(users: impl Iterator<Item = &'a UserRecord>) -> String {
    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Email", "Company", "City", "Phone", "Status"]);
    for user in users {
        table.add_row(vec![
            user.id.to_string(),
            user.name.clone(),
            user.email.clone(),
            user.company_name().unwrap_or("-").to_string(),
            user.address
                .as_ref()
                .map(|a| a.city.clone())
                .unwrap_or_else(|| "-".to_string()),
            user.phone.clone().unwrap_or_else(|| "-".to_string()),
            user.effective_status().to_string(),
        ]);
    }
    table.to_string()
}

fn format_user_details(user: &UserRecord) -> String {
    let mut output = format!("User {}\n", user.id);
    output.push_str(&format!("  Name:     {}\n", user.name));
    if let Some(username) = &user.username {
        output.push_str(&format!("  Username: {}\n", username));
    }
    output.push_str(&format!("  Email:    {}\n", user.email));
    if let Some(phone) = &user.phone {
        output.push_str(&format!("  Phone:    {}\n", phone));
    }
    if let Some(website) = &user.website {
        output.push_str(&format!("  Website:  {}\n", website));
    }
    if let Some(company) = user.company_name() {
        output.push_str(&format!("  Company:  {}\n", company));
    }
    if let Some(address) = &user.address {
        output.push_str(&format!(
            "  Address:  {} {}, {} {}\n",
            address.street, address.suite, address.city, address.zipcode
        ));
    }
    output.push_str(&format!("  Status:   {}", user.effective_status()));
    output
}
