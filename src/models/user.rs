//! User models for the RT API.
//!
//! Users show up both as top-level records (`GET user/{id}`) and as
//! references inside tickets (owner, creator, requestors, watchers).

use serde::{Deserialize, Serialize};

use super::common::null_as_default;
use super::Item;

/// An RT user or a reference to one.
///
/// When embedded in a ticket only the `Item` part is usually populated;
/// `name` and `email_address` are filled in by field expansion or by a
/// follow-up user lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Reference data (`_url`, `type`, `id`).
    #[serde(flatten)]
    pub item: Item,

    /// Login name.
    #[serde(
        default,
        alias = "Name",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    /// Primary email address.
    #[serde(
        rename = "EmailAddress",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub email_address: String,
}

impl User {
    /// Returns the user identifier (empty if the reference had none).
    pub fn id(&self) -> &str {
        &self.item.id
    }

    /// Returns the name, falling back to the email or the identifier.
    pub fn display_name(&self) -> &str {
        [&self.name, &self.email_address, &self.item.id]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("Nobody")
    }

    /// Copies the display fields from a looked-up user record.
    pub(crate) fn enrich_from(&mut self, details: User) {
        self.name = details.name;
        self.email_address = details.email_address;
    }
}
