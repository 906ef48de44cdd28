//! HTTP client for the RT REST 2.0 API.
//!
//! This module provides `RtClient`, which owns a pooled HTTP connection
//! and routes every call through a single request pipeline:
//! build URL, encode body, authenticate, send, check status, return bytes.
//!
//! Each operation makes exactly one attempt. Nothing is retried or cached.
//!
//! # Security
//!
//! Credentials are attached as headers and never logged, including when
//! wire logging (`ClientConfig::debug`) is enabled.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::RtError;
use crate::models::{Comment, Ticket, TicketCreate, TicketCreateResponse, TicketUpdate, User};

/// Maximum idle connections kept per host.
const POOL_MAX_IDLE_PER_HOST: usize = 100;

/// How long an idle pooled connection is kept before eviction.
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Path suffix of the REST API relative to the RT web root.
const REST_API_SUFFIX: &str = "/REST/2.0";

/// Query parameters for a request, encoded in key order.
pub type QueryParams = BTreeMap<String, String>;

/// HTTP client for the RT REST API.
///
/// Cloning is cheap and clones share the connection pool. The client holds
/// no per-request state, so it can be used from many tasks at once.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::new("https://rt.example.com/REST/2.0").with_token("1-14-abcdef");
/// let client = RtClient::new(&config)?;
///
/// let ticket = client.get_ticket(42).await?;
/// println!("#{}: {}", ticket.id, ticket.display_subject());
/// ```
#[derive(Clone)]
pub struct RtClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL for the REST API, without a trailing slash.
    base_url: String,

    /// Request timeout, kept for error reporting.
    timeout: Duration,

    /// Basic auth username.
    username: String,

    /// Basic auth password.
    /// SECURITY: Never log this value!
    password: String,

    /// Auth token, preferred over Basic auth when non-empty.
    /// SECURITY: Never log this value!
    token: String,

    /// Log request and response bodies to the `rt_rest::wire` target.
    debug: bool,
}

impl RtClient {
    /// Creates a new RT client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `RtError::Config` if the API URL is empty, or
    /// `RtError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &ClientConfig) -> Result<Self, RtError> {
        let base_url = Self::normalize_base_url(&config.api_url);
        if base_url.is_empty() {
            return Err(RtError::invalid_config("RT API URL is required"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .build()
            .map_err(RtError::HttpClient)?;

        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
            username: config.username.clone(),
            password: config.password.clone(),
            token: config.token.clone(),
            debug: config.debug,
        })
    }

    /// Trims whitespace and trailing slashes so endpoints join with one `/`.
    fn normalize_base_url(url: &str) -> String {
        url.trim().trim_end_matches('/').to_string()
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the web URL for viewing a ticket in the RT UI.
    pub fn ticket_web_url(&self, id: u64) -> String {
        let web_base = self.base_url.trim_end_matches(REST_API_SUFFIX);
        format!("{}/Ticket/Display.html?id={}", web_base, id)
    }

    /// Builds the full URL for an endpoint, with query parameters appended.
    fn endpoint_url(&self, endpoint: &str, params: Option<&QueryParams>) -> Result<Url, RtError> {
        let mut url =
            Url::parse(&format!("{}/{}", self.base_url, endpoint)).map_err(RtError::InvalidUrl)?;

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.query_pairs_mut().extend_pairs(params.iter());
        }

        Ok(url)
    }

    /// Attaches credentials: the token if one is set, Basic auth otherwise.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        if !self.token.is_empty() {
            req.header(AUTHORIZATION, format!("token {}", self.token))
        } else {
            req.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// Sends a request through the pipeline and returns the raw response body.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `endpoint` - Path relative to the base URL (e.g. "ticket/12")
    /// * `body` - Optional value serialized as the JSON request body
    /// * `params` - Optional query parameters
    ///
    /// # Errors
    ///
    /// - `InvalidUrl`, `Encode`, `RequestBuild` if the request cannot be built
    /// - `Transport` or `Timeout` if no response arrives
    /// - `ResponseRead` if the body cannot be read
    /// - `HttpStatus` for any status outside `200..300`
    pub async fn execute<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        params: Option<&QueryParams>,
    ) -> Result<Vec<u8>, RtError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(endpoint, params)?;

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            let json = serde_json::to_vec(body).map_err(RtError::Encode)?;
            if self.debug {
                tracing::info!(
                    target: "rt_rest::wire",
                    "Request body:\n{}",
                    String::from_utf8_lossy(&json)
                );
            }
            req = req.body(json);
        }

        let request = self.authorize(req).build().map_err(RtError::RequestBuild)?;

        tracing::debug!(method = %method, endpoint = %endpoint, "Making RT API request");
        if self.debug {
            tracing::info!(target: "rt_rest::wire", "Request: {} {}", method, url);
        }

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| self.transport_error(e, &method, &url))?;
        let status = response.status();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e, &method, &url)
            } else {
                RtError::ResponseRead(e)
            }
        })?;

        if self.debug {
            tracing::info!(
                target: "rt_rest::wire",
                "Response: {}",
                String::from_utf8_lossy(&body)
            );
        }

        if !status.is_success() {
            tracing::debug!(status = %status, endpoint = %endpoint, "RT API returned error status");
            return Err(RtError::HttpStatus {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    /// Classifies a reqwest send failure.
    fn transport_error(&self, e: reqwest::Error, method: &Method, url: &Url) -> RtError {
        if e.is_timeout() {
            return RtError::Timeout {
                duration: self.timeout,
                operation: format!("{} {}", method, url),
                source: e,
            };
        }
        RtError::Transport(e)
    }

    /// Decodes a JSON response body.
    fn decode<T>(body: &[u8], target: &'static str) -> Result<T, RtError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(body).map_err(|e| RtError::decode(target, e))
    }

    /// Creates a ticket.
    ///
    /// # Returns
    ///
    /// The acknowledgement with the new ticket's id and URL, not the full ticket.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let body = TicketCreate::new("General", "Printer not working")
    ///     .with_requestor("alice@example.com");
    /// let created = client.create_ticket(&body).await?;
    /// println!("Created ticket #{}", created.id);
    /// ```
    pub async fn create_ticket(
        &self,
        ticket: &TicketCreate,
    ) -> Result<TicketCreateResponse, RtError> {
        let body = self.post("ticket", ticket).await?;
        Self::decode(&body, "ticket creation response")
    }

    /// Gets full details of a single ticket.
    ///
    /// Queue, owner and creator are expanded inline. Every requestor with an
    /// identifier is then looked up so its name and email are filled in.
    ///
    /// # Errors
    ///
    /// Returns `RtError::Enrichment` if any requestor lookup fails; no
    /// partially enriched ticket is returned.
    pub async fn get_ticket(&self, id: u64) -> Result<Ticket, RtError> {
        let params: QueryParams = [
            ("fields[Queue]", "Name"),
            ("fields[Owner]", "Name,EmailAddress"),
            ("fields[Creator]", "Name,EmailAddress"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let path = format!("ticket/{}", id);
        let body = self.get(&path, Some(&params)).await?;
        let mut ticket: Ticket = Self::decode(&body, "ticket")?;

        for requestor in ticket.requestor.iter_mut() {
            if requestor.id().is_empty() {
                continue;
            }

            let user_id = requestor.id().to_string();
            tracing::debug!(ticket = id, user = %user_id, "Fetching requestor details");

            let details = self
                .get_user(&user_id)
                .await
                .map_err(|e| RtError::enrichment(user_id, e))?;
            requestor.enrich_from(details);
        }

        Ok(ticket)
    }

    /// Updates a ticket.
    ///
    /// Only the fields set on `updates` are sent.
    pub async fn update_ticket(&self, id: u64, updates: &TicketUpdate) -> Result<(), RtError> {
        let path = format!("ticket/{}", id);
        self.put(&path, updates).await?;
        Ok(())
    }

    /// Adds an internal comment to a ticket.
    pub async fn comment_ticket(&self, id: u64, comment: &Comment) -> Result<(), RtError> {
        let path = format!("ticket/{}/comment", id);
        self.post(&path, comment).await?;
        Ok(())
    }

    /// Adds correspondence to a ticket, which RT sends to the requestors.
    pub async fn correspond_ticket(&self, id: u64, comment: &Comment) -> Result<(), RtError> {
        let path = format!("ticket/{}/correspond", id);
        self.post(&path, comment).await?;
        Ok(())
    }

    /// Gets a user by id or login name.
    ///
    /// The identifier is placed into the request path as given, without
    /// percent-encoding. Callers passing names that may contain `/`, `?`,
    /// `#` or spaces must escape them first.
    pub async fn get_user(&self, identifier: &str) -> Result<User, RtError> {
        let path = format!("user/{}", identifier);
        let body = self.get(&path, None).await?;
        Self::decode(&body, "user")
    }

    // ========================================================================
    // Private helper methods for HTTP verbs
    // ========================================================================

    /// Makes a GET request.
    async fn get(&self, endpoint: &str, params: Option<&QueryParams>) -> Result<Vec<u8>, RtError> {
        self.execute::<()>(Method::GET, endpoint, None, params).await
    }

    /// Makes a POST request with a JSON body.
    async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Vec<u8>, RtError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, endpoint, Some(body), None).await
    }

    /// Makes a PUT request with a JSON body.
    async fn put<B>(&self, endpoint: &str, body: &B) -> Result<Vec<u8>, RtError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::PUT, endpoint, Some(body), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn test_client() -> RtClient {
        RtClient::new(&ClientConfig::new("https://rt.example.com/REST/2.0/")).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_api_url() {
        let err = RtClient::new(&ClientConfig::new("")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = RtClient::new(&ClientConfig::new("  / ")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            RtClient::normalize_base_url("https://rt.example.com/REST/2.0/"),
            "https://rt.example.com/REST/2.0"
        );
        assert_eq!(
            RtClient::normalize_base_url(" https://rt.example.com "),
            "https://rt.example.com"
        );
    }

    #[test]
    fn test_endpoint_url_joins_with_single_slash() {
        let client = test_client();
        let url = client.endpoint_url("ticket/12", None).unwrap();
        assert_eq!(url.as_str(), "https://rt.example.com/REST/2.0/ticket/12");
    }

    #[test]
    fn test_endpoint_url_encodes_query_in_key_order() {
        let client = test_client();
        let mut params = QueryParams::new();
        params.insert("fields[Owner]".to_string(), "Name,EmailAddress".to_string());
        params.insert("fields[Queue]".to_string(), "Name".to_string());

        let url = client.endpoint_url("ticket/1", Some(&params)).unwrap();
        assert_eq!(
            url.query(),
            Some("fields%5BOwner%5D=Name%2CEmailAddress&fields%5BQueue%5D=Name")
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[1], ("fields[Queue]".to_string(), "Name".to_string()));
    }

    #[test]
    fn test_endpoint_url_empty_params_adds_no_query() {
        let client = test_client();
        let url = client.endpoint_url("user/root", Some(&QueryParams::new())).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_endpoint_url_rejects_unparseable_base() {
        let client = RtClient::new(&ClientConfig::new("not a url")).unwrap();
        let err = client.endpoint_url("ticket", None).unwrap_err();
        assert!(matches!(err, RtError::InvalidUrl(_)));
        assert_eq!(err.kind(), ErrorKind::RequestBuild);
    }

    #[test]
    fn test_ticket_web_url() {
        let client = test_client();
        assert_eq!(
            client.ticket_web_url(42),
            "https://rt.example.com/Ticket/Display.html?id=42"
        );

        let client = RtClient::new(&ClientConfig::new("https://rt.example.com/rt")).unwrap();
        assert_eq!(
            client.ticket_web_url(7),
            "https://rt.example.com/rt/Ticket/Display.html?id=7"
        );
    }
}
