//! Executes parsed commands against an `RtClient`.

use serde::Serialize;

use crate::cli::{Command, TicketCommand, UserCommand};
use crate::error::RtError;
use crate::models::{Ticket, TicketCreate, TicketCreateResponse, TicketUpdate, User};
use crate::rt_client::RtClient;

/// The result of running a command, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A fetched ticket.
    Ticket(Box<Ticket>),
    /// A fetched user.
    User(User),
    /// A newly created ticket.
    Created {
        /// The creation acknowledgement.
        ack: TicketCreateResponse,
        /// Link to the ticket in the RT web UI, when the id is numeric.
        web_url: Option<String>,
    },
    /// A confirmation line for a write.
    Done(String),
}

#[derive(Serialize)]
struct CreatedView<'a> {
    id: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_url: Option<&'a str>,
}

impl Output {
    /// Renders the output: pretty JSON for records, plain text otherwise.
    pub fn render(&self) -> serde_json::Result<String> {
        match self {
            Output::Ticket(ticket) => serde_json::to_string_pretty(ticket),
            Output::User(user) => serde_json::to_string_pretty(user),
            Output::Created { ack, web_url } => serde_json::to_string_pretty(&CreatedView {
                id: &ack.id,
                url: &ack.url,
                web_url: web_url.as_deref(),
            }),
            Output::Done(message) => Ok(message.clone()),
        }
    }
}

/// Runs a command and returns what should be printed.
pub async fn run(client: &RtClient, command: Command) -> Result<Output, RtError> {
    match command {
        Command::Ticket(TicketCommand::Show { id }) => {
            tracing::debug!(id, "ticket show");
            let ticket = client.get_ticket(id).await?;
            Ok(Output::Ticket(Box::new(ticket)))
        }
        Command::Ticket(TicketCommand::Create(args)) => {
            let body = TicketCreate::from(args);
            tracing::debug!(?body, "ticket create");
            let ack = client.create_ticket(&body).await?;
            let web_url = ack.id.parse::<u64>().ok().map(|id| client.ticket_web_url(id));
            Ok(Output::Created { ack, web_url })
        }
        Command::Ticket(TicketCommand::Update(args)) => {
            let id = args.id;
            let update = TicketUpdate::from(args);
            tracing::debug!(id, ?update, "ticket update");
            client.update_ticket(id, &update).await?;
            Ok(Output::Done(format!("Ticket {} updated", id)))
        }
        Command::Ticket(TicketCommand::Comment(args)) => {
            client.comment_ticket(args.id, &args.to_comment()).await?;
            Ok(Output::Done(format!("Comment added to ticket {}", args.id)))
        }
        Command::Ticket(TicketCommand::Correspond(args)) => {
            client.correspond_ticket(args.id, &args.to_comment()).await?;
            Ok(Output::Done(format!("Correspondence added to ticket {}", args.id)))
        }
        Command::User(UserCommand::Show { id }) => {
            tracing::debug!(%id, "user show");
            let user = client.get_user(&id).await?;
            Ok(Output::User(user))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use serde_json::json;

    #[test]
    fn test_render_created() {
        let output = Output::Created {
            ack: Item {
                url: "https://rt.example.com/REST/2.0/ticket/5".to_string(),
                item_type: "ticket".to_string(),
                id: "5".to_string(),
            },
            web_url: Some("https://rt.example.com/Ticket/Display.html?id=5".to_string()),
        };
        let rendered: serde_json::Value = serde_json::from_str(&output.render().unwrap()).unwrap();
        assert_eq!(
            rendered,
            json!({
                "id": "5",
                "url": "https://rt.example.com/REST/2.0/ticket/5",
                "web_url": "https://rt.example.com/Ticket/Display.html?id=5"
            })
        );
    }

    #[test]
    fn test_render_user_uses_wire_names() {
        let user: User = serde_json::from_value(json!({"id": 7, "name": "alice", "EmailAddress": "a@x.com"})).unwrap();
        let rendered: serde_json::Value =
            serde_json::from_str(&Output::User(user).render().unwrap()).unwrap();
        assert_eq!(rendered, json!({"id": "7", "name": "alice", "EmailAddress": "a@x.com"}));
    }

    #[test]
    fn test_render_done_is_plain_text() {
        let output = Output::Done("Ticket 3 updated".to_string());
        assert_eq!(output.render().unwrap(), "Ticket 3 updated");
    }
}
