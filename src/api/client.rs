use crate::api::models::{
    ApiRequest, ApiResponse, CloseTicketParams, CreateTicketParams, CreateUserParams,
    DepartmentData, SlaData, TicketData, TopicData, User, UserData,
};
use crate::error::ApiError;
use reqwest::{Client, Method};
use serde_json::{Map, Value, json};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("osticket-cli/", env!("CARGO_PKG_VERSION"));

/// Sentinel status value the upstream uses to signal failure; anything else
/// in the envelope's `status` field counts as success.
const STATUS_ERROR: &str = "Error";

/// Client for the osTicket API.
///
/// The whole API lives behind one endpoint (the configured base URL); every
/// operation sends a JSON envelope selecting the resource (`query`) and
/// operation (`condition`). Stateless across calls apart from the held
/// credentials and the reused HTTP transport; no call is ever retried.
#[derive(Debug, Clone)]
pub struct OsTicketClient {
    client: Client,
    pub base_url: String,
    api_key: String,
}

impl OsTicketClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client_init".to_string(),
                source,
            })?;

        Ok(OsTicketClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Performs one envelope exchange and decodes the response envelope.
    ///
    /// Ticket retrieval by identifier uses GET-with-body; every other
    /// operation POSTs. Both go to the same URL.
    async fn send(&self, method: Method, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let endpoint = format!("{}/{}", request.query, request.condition);
        let body = self.exchange(method, request, &endpoint).await?;

        let response: ApiResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Format {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        if response.status == STATUS_ERROR {
            return Err(ApiError::Upstream {
                message: response.message.unwrap_or_default(),
            });
        }

        Ok(response)
    }

    /// Performs one envelope exchange and returns the body untouched.
    /// No envelope decoding and no error-status check; this backs the CLI's
    /// `--raw` passthrough mode.
    async fn send_raw(&self, method: Method, request: &ApiRequest) -> Result<String, ApiError> {
        let endpoint = format!("{}/{}", request.query, request.condition);
        self.exchange(method, request, &endpoint).await
    }

    async fn exchange(
        &self,
        method: Method,
        request: &ApiRequest,
        endpoint: &str,
    ) -> Result<String, ApiError> {
        let response = self
            .client
            .request(method, &self.base_url)
            .header("apikey", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        response.text().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Extracts the `data` payload, treating an absent payload as a shape
    /// mismatch for operations that require one.
    fn require_data(response: ApiResponse, endpoint: &str) -> Result<Value, ApiError> {
        response.data.ok_or_else(|| ApiError::Format {
            endpoint: endpoint.to_string(),
            message: "response has no data payload".to_string(),
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(data: Value, endpoint: &str) -> Result<T, ApiError> {
        serde_json::from_value(data).map_err(|e| ApiError::Format {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    fn ticket_request(id: &str) -> ApiRequest {
        let mut parameters = Map::new();
        parameters.insert("id".to_string(), json!(id));
        ApiRequest {
            query: "ticket".to_string(),
            condition: "specific".to_string(),
            sort: None,
            parameters,
        }
    }

    /// Gets a ticket by internal id or public ticket number.
    ///
    /// The upstream answers this one call with three distinct data shapes;
    /// `TicketData::from_data` normalizes all of them.
    pub async fn get_ticket(&self, id: &str) -> Result<TicketData, ApiError> {
        let response = self.send(Method::GET, &Self::ticket_request(id)).await?;
        let data = Self::require_data(response, "ticket/specific")?;
        TicketData::from_data(data, "ticket/specific")
    }

    pub async fn get_ticket_raw(&self, id: &str) -> Result<String, ApiError> {
        self.send_raw(Method::GET, &Self::ticket_request(id)).await
    }

    fn status_request(status: i64) -> ApiRequest {
        let mut parameters = Map::new();
        parameters.insert("status".to_string(), json!(status));
        ApiRequest {
            query: "ticket".to_string(),
            condition: "all".to_string(),
            sort: Some("status".to_string()),
            parameters,
        }
    }

    /// Lists tickets by status id; 0 means all statuses.
    ///
    /// Listing endpoints only ever answer with the nested shape, so no
    /// fallback chain here; a mismatch surfaces as a format error.
    pub async fn get_tickets_by_status(&self, status: i64) -> Result<TicketData, ApiError> {
        let response = self.send(Method::POST, &Self::status_request(status)).await?;
        let data = Self::require_data(response, "ticket/all")?;
        Self::decode(data, "ticket/all")
    }

    pub async fn get_tickets_by_status_raw(&self, status: i64) -> Result<String, ApiError> {
        self.send_raw(Method::POST, &Self::status_request(status)).await
    }

    fn date_range_request(start_date: &str, end_date: &str) -> ApiRequest {
        let mut parameters = Map::new();
        parameters.insert("start_date".to_string(), json!(start_date));
        parameters.insert("end_date".to_string(), json!(end_date));
        ApiRequest {
            query: "ticket".to_string(),
            condition: "all".to_string(),
            sort: Some("creationDate".to_string()),
            parameters,
        }
    }

    /// Lists tickets created within `[start_date, end_date]` (YYYY-MM-DD).
    pub async fn get_tickets_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<TicketData, ApiError> {
        let request = Self::date_range_request(start_date, end_date);
        let response = self.send(Method::POST, &request).await?;
        let data = Self::require_data(response, "ticket/all")?;
        Self::decode(data, "ticket/all")
    }

    pub async fn get_tickets_by_date_range_raw(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<String, ApiError> {
        let request = Self::date_range_request(start_date, end_date);
        self.send_raw(Method::POST, &request).await
    }

    /// Creates a ticket and returns the new ticket id.
    pub async fn create_ticket(&self, params: &CreateTicketParams) -> Result<i64, ApiError> {
        let mut parameters = Map::new();
        parameters.insert("title".to_string(), json!(params.title));
        parameters.insert("subject".to_string(), json!(params.subject));
        parameters.insert("user_id".to_string(), json!(params.user_id));
        parameters.insert("priority_id".to_string(), json!(params.priority_id));
        parameters.insert("status_id".to_string(), json!(params.status_id));
        parameters.insert("dept_id".to_string(), json!(params.dept_id));
        parameters.insert("sla_id".to_string(), json!(params.sla_id));
        parameters.insert("topic_id".to_string(), json!(params.topic_id));

        let request = ApiRequest {
            query: "ticket".to_string(),
            condition: "add".to_string(),
            sort: None,
            parameters,
        };

        let response = self.send(Method::POST, &request).await?;
        let data = Self::require_data(response, "ticket/add")?;
        Self::decode(data, "ticket/add")
    }

    /// Adds a staff reply to a ticket. Success carries no payload.
    pub async fn reply_to_ticket(
        &self,
        ticket_id: i64,
        body: &str,
        staff_id: i64,
    ) -> Result<(), ApiError> {
        let mut parameters = Map::new();
        parameters.insert("ticket_id".to_string(), json!(ticket_id));
        parameters.insert("body".to_string(), json!(body));
        parameters.insert("staff_id".to_string(), json!(staff_id));

        let request = ApiRequest {
            query: "ticket".to_string(),
            condition: "reply".to_string(),
            sort: None,
            parameters,
        };

        self.send(Method::POST, &request).await?;
        Ok(())
    }

    /// Closes a ticket. Success carries no payload.
    pub async fn close_ticket(&self, params: &CloseTicketParams) -> Result<(), ApiError> {
        let mut parameters = Map::new();
        parameters.insert("ticket_id".to_string(), json!(params.ticket_id));
        parameters.insert("body".to_string(), json!(params.body));
        parameters.insert("staff_id".to_string(), json!(params.staff_id));
        parameters.insert("status_id".to_string(), json!(params.status_id));
        parameters.insert("team_id".to_string(), json!(params.team_id));
        parameters.insert("dept_id".to_string(), json!(params.dept_id));
        parameters.insert("topic_id".to_string(), json!(params.topic_id));
        parameters.insert("username".to_string(), json!(params.username));

        let request = ApiRequest {
            query: "ticket".to_string(),
            condition: "close".to_string(),
            sort: None,
            parameters,
        };

        self.send(Method::POST, &request).await?;
        Ok(())
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<UserData, ApiError> {
        let mut parameters = Map::new();
        parameters.insert("id".to_string(), json!(id));

        let request = ApiRequest {
            query: "user".to_string(),
            condition: "specific".to_string(),
            sort: Some("id".to_string()),
            parameters,
        };

        let response = self.send(Method::POST, &request).await?;
        let data = Self::require_data(response, "user/specific")?;
        Self::decode(data, "user/specific")
    }

    fn user_by_email_request(email: &str) -> ApiRequest {
        let mut parameters = Map::new();
        parameters.insert("email".to_string(), json!(email));
        ApiRequest {
            query: "user".to_string(),
            condition: "specific".to_string(),
            sort: Some("email".to_string()),
            parameters,
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<UserData, ApiError> {
        let request = Self::user_by_email_request(email);
        let response = self.send(Method::POST, &request).await?;
        let data = Self::require_data(response, "user/specific")?;
        Self::decode(data, "user/specific")
    }

    pub async fn get_user_by_email_raw(&self, email: &str) -> Result<String, ApiError> {
        self.send_raw(Method::POST, &Self::user_by_email_request(email)).await
    }

    /// Creates a user and returns the new user id.
    pub async fn create_user(&self, params: &CreateUserParams) -> Result<i64, ApiError> {
        let mut parameters = Map::new();
        parameters.insert("name".to_string(), json!(params.name));
        parameters.insert("email".to_string(), json!(params.email));
        parameters.insert("password".to_string(), json!(params.password));
        parameters.insert("phone".to_string(), json!(params.phone));
        parameters.insert("timezone".to_string(), json!(params.timezone));
        parameters.insert("org_id".to_string(), json!(params.org_id));
        parameters.insert("default_email_id".to_string(), json!(params.default_email_id));
        parameters.insert("status".to_string(), json!(params.status));

        let request = ApiRequest {
            query: "user".to_string(),
            condition: "add".to_string(),
            sort: None,
            parameters,
        };

        let response = self.send(Method::POST, &request).await?;
        let data = Self::require_data(response, "user/add")?;
        Self::decode(data, "user/add")
    }

    async fn list_all(&self, query: &str) -> Result<Value, ApiError> {
        let request = ApiRequest {
            query: query.to_string(),
            condition: "all".to_string(),
            sort: Some("all".to_string()),
            parameters: Map::new(),
        };
        let endpoint = format!("{}/all", query);
        let response = self.send(Method::POST, &request).await?;
        Self::require_data(response, &endpoint)
    }

    pub async fn get_departments(&self) -> Result<DepartmentData, ApiError> {
        let data = self.list_all("department").await?;
        Self::decode(data, "department/all")
    }

    pub async fn get_topics(&self) -> Result<TopicData, ApiError> {
        let data = self.list_all("topics").await?;
        Self::decode(data, "topics/all")
    }

    pub async fn get_slas(&self) -> Result<SlaData, ApiError> {
        let data = self.list_all("sla").await?;
        Self::decode(data, "sla/all")
    }

    /// Searches tickets belonging to the user with the given email.
    ///
    /// The upstream has no server-side filter for this, so the search is a
    /// composite: resolve the user, list all tickets, filter here by
    /// matching user id (linear in the total ticket count). A miss on the
    /// user lookup is an empty result, not an error.
    pub async fn search_tickets_by_email(
        &self,
        email: &str,
    ) -> Result<(TicketData, Option<User>), ApiError> {
        let user_data = self.get_user_by_email(email).await?;

        let Some(user) = user_data.users.into_iter().next() else {
            return Ok((TicketData::empty(), None));
        };

        let all_tickets = self.get_tickets_by_status(0).await?;

        let filtered: Vec<Vec<_>> = all_tickets
            .tickets
            .into_iter()
            .filter(|group| group.iter().any(|t| t.user_id == user.user_id))
            .collect();

        Ok((
            TicketData {
                total: filtered.len() as i64,
                tickets: filtered,
            },
            Some(user),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OsTicketClient::new(
            "http://example.test/api/http.php".to_string(),
            "key".to_string(),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            OsTicketClient::new("http://example.test/".to_string(), "key".to_string())
                .expect("client creation failed");
        assert_eq!(client.base_url, "http://example.test");
    }

    #[test]
    fn test_ticket_request_envelope() {
        let request = OsTicketClient::ticket_request("123456");
        assert_eq!(request.query, "ticket");
        assert_eq!(request.condition, "specific");
        assert!(request.sort.is_none());
        assert_eq!(request.parameters["id"], "123456");
    }

    #[test]
    fn test_status_request_envelope() {
        let request = OsTicketClient::status_request(0);
        assert_eq!(request.query, "ticket");
        assert_eq!(request.condition, "all");
        assert_eq!(request.sort.as_deref(), Some("status"));
        assert_eq!(request.parameters["status"], 0);
    }

    #[test]
    fn test_date_range_request_envelope() {
        let request = OsTicketClient::date_range_request("2024-01-01", "2024-01-31");
        assert_eq!(request.sort.as_deref(), Some("creationDate"));
        assert_eq!(request.parameters["start_date"], "2024-01-01");
        assert_eq!(request.parameters["end_date"], "2024-01-31");
    }
}
