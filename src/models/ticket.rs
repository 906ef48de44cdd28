//! Ticket models for the RT API.
//!
//! This module defines the full ticket record returned by `GET ticket/{id}`
//! and the request bodies used to create and update tickets.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::null_as_default;
use super::{Item, User};

/// A queue reference, with its name when expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    /// Reference data (`_url`, `type`, `id`).
    #[serde(flatten)]
    pub item: Item,

    /// Queue name (present when `fields[Queue]=Name` was requested).
    #[serde(
        rename = "Name",
        alias = "name",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
}

/// A custom field value attached to a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Reference data (`_url`, `type`, `id`).
    #[serde(flatten)]
    pub item: Item,

    /// Custom field name.
    #[serde(
        default,
        alias = "Name",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    /// Current values; multi-value fields have more than one.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub values: Vec<String>,
}

/// Full details of a single ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Ticket {
    /// Ticket number.
    #[serde(rename = "id")]
    pub id: u64,

    /// Subject line.
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,

    /// Queue the ticket lives in.
    #[serde(deserialize_with = "null_as_default")]
    pub queue: Queue,

    /// Lifecycle status (e.g. "new", "open", "resolved").
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    /// Priority the ticket escalates towards.
    #[serde(deserialize_with = "null_as_default")]
    pub final_priority: String,

    /// Assigned owner.
    #[serde(deserialize_with = "null_as_default")]
    pub owner: User,

    /// Requestors, enriched with name and email by `get_ticket`.
    #[serde(deserialize_with = "null_as_default")]
    pub requestor: Vec<User>,

    /// Creation time.
    pub created: Option<DateTime<Utc>>,

    /// Cc watchers.
    #[serde(deserialize_with = "null_as_default")]
    pub cc: Vec<User>,

    /// User that created the ticket.
    #[serde(deserialize_with = "null_as_default")]
    pub creator: User,

    /// Time left, in minutes.
    #[serde(deserialize_with = "null_as_default")]
    pub time_left: String,

    /// Time estimated, in minutes.
    #[serde(deserialize_with = "null_as_default")]
    pub time_estimated: String,

    /// AdminCc watchers.
    #[serde(deserialize_with = "null_as_default")]
    pub admin_cc: Vec<User>,

    /// Scheduled start.
    pub starts: Option<DateTime<Utc>>,

    /// Actual start.
    pub started: Option<DateTime<Utc>>,

    /// Last modification time.
    pub last_updated: Option<DateTime<Utc>>,

    /// Priority at creation.
    #[serde(deserialize_with = "null_as_default")]
    pub initial_priority: String,

    /// Due date.
    pub due: Option<DateTime<Utc>>,

    /// User that last modified the ticket.
    #[serde(deserialize_with = "null_as_default")]
    pub last_updated_by: User,

    /// Current priority.
    #[serde(deserialize_with = "null_as_default")]
    pub priority: String,

    /// Resolution time.
    pub resolved: Option<DateTime<Utc>>,

    /// The ticket this one was merged into (itself if never merged).
    #[serde(rename = "EffectiveID", alias = "EffectiveId", deserialize_with = "null_as_default")]
    pub effective_id: Item,

    /// Custom field values.
    #[serde(deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
}

impl Ticket {
    /// Returns the subject or a placeholder.
    pub fn display_subject(&self) -> &str {
        if self.subject.is_empty() {
            "(No subject)"
        } else {
            &self.subject
        }
    }

    /// Returns the values of the named custom field, if present.
    pub fn custom_field(&self, name: &str) -> Option<&[String]> {
        self.custom_fields
            .iter()
            .find(|cf| cf.name == name)
            .map(|cf| cf.values.as_slice())
    }
}

/// Fields for creating a new ticket.
///
/// Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TicketCreate {
    /// Subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Queue name or id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,

    /// Initial status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Initial priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Owner name or id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Requestor email address or name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requestor: Option<String>,

    /// Body of the initial message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// MIME type of `content` (e.g. "text/plain").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Parent ticket id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Custom field values keyed by field name or id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<BTreeMap<String, String>>,
}

impl TicketCreate {
    /// Creates a ticket body for the given queue and subject.
    pub fn new(queue: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            queue: Some(queue.into()),
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    /// Sets the requestor.
    pub fn with_requestor(mut self, requestor: impl Into<String>) -> Self {
        self.requestor = Some(requestor.into());
        self
    }

    /// Sets the owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the initial priority.
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the parent ticket.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the initial message as plain text.
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self.content_type = Some("text/plain".to_string());
        self
    }

    /// Sets a custom field value.
    pub fn with_custom_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Acknowledgement returned when a ticket is created.
pub type TicketCreateResponse = Item;

/// A sparse ticket update.
///
/// `None` fields are left out of the request entirely, so the server keeps
/// its current value. `Some("")` is sent as-is and clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TicketUpdate {
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// New subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// New owner name or id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Queue to move the ticket to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,

    /// Custom field values keyed by field name or id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<BTreeMap<String, String>>,
}

impl TicketUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the queue.
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Sets a custom field value.
    pub fn with_custom_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_ticket_decodes_nested_identifiers() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 12,
            "Subject": "Printer on fire",
            "Status": "open",
            "Queue": {"id": 1, "type": "queue", "_url": "https://rt/REST/2.0/queue/1", "Name": "General"},
            "Owner": {"id": "Nobody", "type": "user", "_url": "https://rt/REST/2.0/user/Nobody"},
            "Creator": {"id": 14, "Name": "root", "EmailAddress": "root@example.com"},
            "Requestor": [{"id": "7"}, {"id": 8}, {"id": null}],
            "Cc": [],
            "AdminCc": null,
            "Created": "2024-02-01T10:30:00Z",
            "Resolved": null,
            "EffectiveID": {"id": "12", "type": "ticket"},
            "CustomFields": [{"id": 3, "name": "Severity", "values": ["High"]}]
        }))
        .unwrap();

        assert_eq!(ticket.id, 12);
        assert_eq!(ticket.queue.item.id, "1");
        assert_eq!(ticket.queue.name, "General");
        assert_eq!(ticket.owner.id(), "Nobody");
        assert_eq!(ticket.creator.id(), "14");
        assert_eq!(ticket.creator.email_address, "root@example.com");

        let ids: Vec<&str> = ticket.requestor.iter().map(User::id).collect();
        assert_eq!(ids, vec!["7", "8", ""]);

        assert!(ticket.admin_cc.is_empty());
        assert_eq!(
            ticket.created.map(|t| t.to_rfc3339()),
            Some("2024-02-01T10:30:00+00:00".to_string())
        );
        assert_eq!(ticket.resolved, None);
        assert_eq!(ticket.effective_id.id, "12");
        assert_eq!(ticket.custom_field("Severity"), Some(&["High".to_string()][..]));
        assert_eq!(ticket.custom_field("Missing"), None);
    }

    #[test]
    fn test_ticket_rejects_bad_nested_identifier() {
        let result = serde_json::from_value::<Ticket>(json!({
            "id": 1,
            "Requestor": [{"id": [7]}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_ticket_null_scalars_decode_as_empty() {
        let ticket: Ticket = serde_json::from_value(json!({
            "id": 1,
            "Subject": null,
            "Status": null,
            "TimeLeft": null,
            "TimeEstimated": null,
            "Priority": null,
            "InitialPriority": null,
            "FinalPriority": null,
            "Queue": {"id": 1, "Name": null},
            "CustomFields": [{"id": 3, "name": null, "values": null}]
        }))
        .unwrap();

        assert_eq!(ticket.id, 1);
        assert_eq!(ticket.display_subject(), "(No subject)");
        assert_eq!(ticket.time_left, "");
        assert_eq!(ticket.priority, "");
        assert_eq!(ticket.queue.item.id, "1");
        assert_eq!(ticket.queue.name, "");
        assert_eq!(ticket.custom_fields[0].name, "");
        assert!(ticket.custom_fields[0].values.is_empty());
    }

    #[test]
    fn test_display_subject() {
        let mut ticket = Ticket::default();
        assert_eq!(ticket.display_subject(), "(No subject)");
        ticket.subject = "Hello".to_string();
        assert_eq!(ticket.display_subject(), "Hello");
    }

    #[test]
    fn test_ticket_create_serializes_only_set_fields() {
        let body = TicketCreate::new("General", "New laptop")
            .with_requestor("alice@example.com")
            .with_text("Please order one")
            .with_custom_field("Severity", "Low");

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "Subject": "New laptop",
                "Queue": "General",
                "Requestor": "alice@example.com",
                "Content": "Please order one",
                "ContentType": "text/plain",
                "CustomFields": {"Severity": "Low"}
            })
        );
    }

    #[test]
    fn test_ticket_update_omits_unset_fields() {
        let update = TicketUpdate::new().with_status("resolved");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"Status": "resolved"})
        );
    }

    #[test]
    fn test_ticket_update_sends_explicit_empty_values() {
        let update = TicketUpdate::new().with_owner("").with_custom_field("Severity", "");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"Owner": "", "CustomFields": {"Severity": ""}})
        );
    }

    #[test]
    fn test_ticket_update_is_empty() {
        assert!(TicketUpdate::new().is_empty());
        assert!(!TicketUpdate::new().with_subject("").is_empty());
    }

    #[test]
    fn test_create_response_decodes_numeric_id() {
        let ack: TicketCreateResponse = serde_json::from_value(json!({
            "_url": "https://rt.example.com/REST/2.0/ticket/20",
            "type": "ticket",
            "id": 20
        }))
        .unwrap();
        assert_eq!(ack.id, "20");
        assert_eq!(ack.item_type, "ticket");
    }
}
