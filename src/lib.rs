//! # rt-rest
//!
//! A client for the Request Tracker (RT) REST 2.0 API.
//!
//! It authenticates, creates, reads and updates tickets, adds comments and
//! correspondence, and looks up users, decoding RT's responses into typed
//! records.
//!
//! ## Architecture
//!
//! - [`config`] - Client settings, built in code or loaded from `RT_*` variables
//! - [`error`] - The `RtError` type and its `ErrorKind` classification
//! - [`rt_client`] - The request pipeline and the ticket/user operations
//! - [`models`] - Ticket, user and comment types, and identifier decoding
//! - [`cli`] - Argument parsing and command dispatch for the `rt` binary
//!
//! ## Identifiers
//!
//! RT returns `id` fields as strings on some endpoints and numbers on
//! others. Every user, queue and reference id is normalized to a `String`
//! during decoding; see [`models::identifier`].
//!
//! ## Authentication
//!
//! If a token is configured every request carries `Authorization: token <T>`.
//! Otherwise HTTP Basic authentication is sent with the configured username
//! and password. The two are never combined.
//!
//! ## Example
//!
//! ```ignore
//! use rt_rest::config::ClientConfig;
//! use rt_rest::models::{Comment, TicketUpdate};
//! use rt_rest::rt_client::RtClient;
//!
//! async fn example() -> Result<(), rt_rest::error::RtError> {
//!     let config = ClientConfig::new("https://rt.example.com/REST/2.0")
//!         .with_token("1-14-abcdef");
//!     let client = RtClient::new(&config)?;
//!
//!     let ticket = client.get_ticket(42).await?;
//!     for requestor in &ticket.requestor {
//!         println!("{} <{}>", requestor.name, requestor.email_address);
//!     }
//!
//!     client.comment_ticket(42, &Comment::text("Looking into it")).await?;
//!     client
//!         .update_ticket(42, &TicketUpdate::new().with_status("open"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod rt_client;
