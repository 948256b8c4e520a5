use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for the single osTicket API endpoint.
///
/// Every operation sends one of these; the envelope is built once and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequest {
    pub query: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

/// Response envelope returned by the osTicket API.
///
/// `data` is opaque here; its shape depends on the resource and is decoded
/// per operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// A single ticket record. Rows can be sparse depending on the endpoint, so
/// every field defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Ticket {
    pub ticket_id: i64,
    pub ticket_pid: i64,
    pub number: String,
    pub user_id: i64,
    pub user_email_id: i64,
    pub status_id: i64,
    pub dept_id: i64,
    pub sla_id: i64,
    pub topic_id: i64,
    pub staff_id: i64,
    pub team_id: i64,
    pub email_id: i64,
    pub lock_id: i64,
    pub flags: i64,
    pub sort: i64,
    pub subject: String,
    pub title: String,
    pub body: String,
    pub ip_address: String,
    pub source: String,
    pub source_extra: String,
    pub isoverdue: i64,
    pub isanswered: i64,
    pub duedate: String,
    pub est_duedate: String,
    pub reopened: String,
    pub closed: String,
    pub lastupdate: String,
    pub created: String,
    pub updated: String,
}

/// Canonical ticket collection: a sequence of thread groups (original ticket
/// plus its replies), regardless of the shape the server answered with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketData {
    pub total: i64,
    pub tickets: Vec<Vec<Ticket>>,
}

#[derive(Debug, Deserialize)]
struct FlatTicketData {
    total: i64,
    tickets: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
struct SingleTicketData {
    total: i64,
    ticket: Ticket,
}

impl TicketData {
    pub fn empty() -> Self {
        TicketData {
            total: 0,
            tickets: Vec::new(),
        }
    }

    /// Decodes the `data` payload of a ticket-by-id response.
    ///
    /// The upstream emits three distinct shapes for the same logical call,
    /// tried here in fixed priority order, first successful decode wins:
    ///
    /// 1. nested: `{total, tickets: [[record...], ...]}` — already canonical
    /// 2. flat: `{total, tickets: [record, ...]}` — each record becomes its
    ///    own singleton group
    /// 3. single: `{total, ticket: record}` — wrapped as `[[record]]`
    ///
    /// Each attempt decodes a clone of the payload, so a failed attempt
    /// leaks nothing into the next. The `total` and `tickets`/`ticket` keys
    /// stay required in the decode structs; a payload missing them falls
    /// through instead of succeeding with an empty collection.
    pub fn from_data(data: Value, endpoint: &str) -> Result<Self, ApiError> {
        if let Ok(nested) = serde_json::from_value::<TicketData>(data.clone()) {
            return Ok(nested);
        }

        if let Ok(flat) = serde_json::from_value::<FlatTicketData>(data.clone()) {
            return Ok(TicketData {
                total: flat.total,
                tickets: flat.tickets.into_iter().map(|t| vec![t]).collect(),
            });
        }

        if let Ok(single) = serde_json::from_value::<SingleTicketData>(data) {
            return Ok(TicketData {
                total: single.total,
                tickets: vec![vec![single.ticket]],
            });
        }

        Err(ApiError::Format {
            endpoint: endpoint.to_string(),
            message: "unexpected ticket response format".to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub created: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub total: i64,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentData {
    pub total: i64,
    pub departments: Vec<Department>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: i64,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicData {
    pub total: i64,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sla {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub grace_period: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaData {
    pub total: i64,
    pub sla: Vec<Sla>,
}

/// Parameters for creating a ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketParams {
    pub title: String,
    pub subject: String,
    pub user_id: i64,
    pub priority_id: i64,
    pub status_id: i64,
    pub dept_id: i64,
    pub sla_id: i64,
    pub topic_id: i64,
}

/// Parameters for closing a ticket.
#[derive(Debug, Clone)]
pub struct CloseTicketParams {
    pub ticket_id: i64,
    pub body: String,
    pub staff_id: i64,
    pub status_id: i64,
    pub team_id: i64,
    pub dept_id: i64,
    pub topic_id: i64,
    pub username: String,
}

/// Parameters for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub timezone: String,
    pub org_id: i64,
    pub default_email_id: i64,
    pub status: i64,
}
