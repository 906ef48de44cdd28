//! Command line arguments for the `rt` binary.
//!
//! # Input Sanitization
//!
//! String arguments are trimmed when converted into request bodies. On
//! `ticket create` blank optional values are treated as not given. On
//! `ticket update` a flag that is present is always sent, so `--owner ""`
//! or `--cf Severity=` deliberately clears the field.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::ClientConfig;
use crate::models::{Comment, TicketCreate, TicketUpdate};

/// Helper function to trim an optional string, dropping blank values.
fn trim_option(s: Option<String>) -> Option<String> {
    trim_keep_empty(s).filter(|s| !s.is_empty())
}

/// Trims an optional string but keeps an explicit empty value.
fn trim_keep_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string())
}

/// Parses a `NAME=VALUE` custom field assignment.
fn parse_custom_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("custom field name is empty in {:?}", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Command line client for Request Tracker.
///
/// Connection settings come from `RT_API_URL`, `RT_TOKEN` (or `RT_USERNAME`
/// and `RT_PASSWORD`), `RT_TIMEOUT_SECS` and `RT_DEBUG`, optionally loaded
/// from a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "rt", version, about)]
pub struct Cli {
    /// Log request and response bodies to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Request timeout in seconds (overrides RT_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Applies command line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if self.debug {
            config.debug = true;
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}

/// Top-level resource commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with tickets.
    #[command(subcommand)]
    Ticket(TicketCommand),

    /// Work with users.
    #[command(subcommand)]
    User(UserCommand),
}

/// Ticket subcommands.
#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    /// Show a ticket with its requestors' details.
    Show {
        /// Ticket number.
        id: u64,
    },

    /// Create a ticket.
    Create(CreateArgs),

    /// Update fields on a ticket.
    Update(UpdateArgs),

    /// Add an internal comment.
    Comment(MessageArgs),

    /// Reply to the requestors.
    Correspond(MessageArgs),
}

/// User subcommands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show a user by id or login name.
    Show {
        /// User id or login name.
        id: String,
    },
}

/// Arguments for `ticket create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Queue name or id.
    #[arg(long)]
    pub queue: String,

    /// Subject line.
    #[arg(long)]
    pub subject: String,

    /// Requestor email address.
    #[arg(long)]
    pub requestor: Option<String>,

    /// Owner name.
    #[arg(long)]
    pub owner: Option<String>,

    /// Initial message, sent as plain text.
    #[arg(long)]
    pub text: Option<String>,

    /// Custom field value, as NAME=VALUE. Repeatable.
    #[arg(long = "cf", value_name = "NAME=VALUE", value_parser = parse_custom_field)]
    pub custom_fields: Vec<(String, String)>,
}

impl From<CreateArgs> for TicketCreate {
    fn from(args: CreateArgs) -> Self {
        let mut body = TicketCreate::new(args.queue.trim(), args.subject.trim());
        if let Some(requestor) = trim_option(args.requestor) {
            body = body.with_requestor(requestor);
        }
        if let Some(owner) = trim_option(args.owner) {
            body = body.with_owner(owner);
        }
        if let Some(text) = trim_option(args.text) {
            body = body.with_text(text);
        }
        for (name, value) in args.custom_fields {
            body = body.with_custom_field(name, value);
        }
        body
    }
}

/// Arguments for `ticket update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Ticket number.
    pub id: u64,

    /// New status (e.g. "open", "resolved"). Every field flag that is given
    /// is sent, including an empty value.
    #[arg(long)]
    pub status: Option<String>,

    /// New subject.
    #[arg(long)]
    pub subject: Option<String>,

    /// New owner; pass "Nobody" to unassign.
    #[arg(long)]
    pub owner: Option<String>,

    /// New priority.
    #[arg(long)]
    pub priority: Option<String>,

    /// Queue to move the ticket to.
    #[arg(long)]
    pub queue: Option<String>,

    /// Custom field value, as NAME=VALUE. Repeatable; an empty VALUE clears it.
    #[arg(long = "cf", value_name = "NAME=VALUE", value_parser = parse_custom_field)]
    pub custom_fields: Vec<(String, String)>,
}

impl From<UpdateArgs> for TicketUpdate {
    fn from(args: UpdateArgs) -> Self {
        let mut update = TicketUpdate::new();
        if let Some(status) = trim_keep_empty(args.status) {
            update = update.with_status(status);
        }
        if let Some(subject) = trim_keep_empty(args.subject) {
            update = update.with_subject(subject);
        }
        if let Some(owner) = trim_keep_empty(args.owner) {
            update = update.with_owner(owner);
        }
        if let Some(priority) = trim_keep_empty(args.priority) {
            update = update.with_priority(priority);
        }
        if let Some(queue) = trim_keep_empty(args.queue) {
            update = update.with_queue(queue);
        }
        for (name, value) in args.custom_fields {
            update = update.with_custom_field(name, value);
        }
        update
    }
}

/// Arguments for `ticket comment` and `ticket correspond`.
#[derive(Debug, Args)]
pub struct MessageArgs {
    /// Ticket number.
    pub id: u64,

    /// Message body.
    pub text: String,

    /// Send the body as HTML instead of plain text.
    #[arg(long)]
    pub html: bool,
}

impl MessageArgs {
    /// Builds the message body.
    pub fn to_comment(&self) -> Comment {
        if self.html {
            Comment::html(self.text.clone())
        } else {
            Comment::text(self.text.clone())
        }
    }
}
