//! Data models for the RT REST 2.0 API.
//!
//! This module contains the ticket, user and comment types, plus the
//! shared `Item` reference and identifier decoding they are built on.

mod comment;
pub mod common;
mod ticket;
mod user;

pub use comment::*;
pub use common::{identifier, Item};
pub use ticket::*;
pub use user::*;
