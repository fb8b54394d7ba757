//! Common utilities for NetBox API client
//!
//! Provides the HTTP transport and the pagination envelope shared by all endpoints.

pub mod query;

use crate::error::NetBoxError;
use crate::netbox_trait::Transport;
use crate::operation::{ApiResponse, Operation};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Paginated response wrapper from NetBox API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// HTTP transport with token authentication
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    /// * `client` - Preconfigured reqwest client (timeouts, TLS, default headers)
    /// * `base_url` - NetBox base URL (e.g., "http://netbox:80")
    /// * `token` - API token for authentication
    pub fn new(client: Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, operation: Operation) -> Result<ApiResponse, NetBoxError> {
        let mut url = self.build_url(&operation.path);
        if !operation.query.is_empty() {
            url = format!("{}?{}", url, query::build_query_string(&operation.query));
        }
        debug!("{} {} ({})", operation.method, url, operation.id);

        let mut request = self
            .client
            .request(operation.method.clone(), &url)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json");
        if let Some(body) = &operation.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(NetBoxError::Http)?;
        let status = response.status();

        if !status.is_success() {
            // Body only feeds the message here; a failed read must not hide the status
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                404 => NetBoxError::NotFound(format!("{} {}: {}", operation.id, operation.path, body)),
                401 | 403 => NetBoxError::Authentication(format!("{} rejected: {} - {}", operation.id, status, body)),
                _ => NetBoxError::Api(format!("{} failed: {} - {}", operation.id, status, body)),
            });
        }

        let body = response.text().await.map_err(NetBoxError::Http)?;
        let payload = if body.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&body).map_err(|e| {
                NetBoxError::Api(format!(
                    "error decoding response body: {} - Response (first 500 chars): {}",
                    e,
                    body.chars().take(500).collect::<String>()
                ))
            })?)
        };

        Ok(ApiResponse::new(status.as_u16(), payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one request with a raw HTTP response, then close the connection
    async fn serve_once(response: &'static str) -> HttpTransport {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.expect("write response");
            let _ = socket.shutdown().await;
        });
        HttpTransport::new(Client::new(), format!("http://{addr}"), "t".to_string())
    }

    fn read_op() -> Operation {
        Operation::new("extras_tags_read", Method::GET, "/api/extras/tags/1/")
    }

    #[tokio::test]
    async fn test_submit_decodes_success_payload() {
        let transport = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 22\r\nConnection: close\r\n\r\n{\"id\": 1, \"name\": \"a\"}",
        )
        .await;

        let response = transport.submit(read_op()).await.expect("submit");
        assert_eq!(response.status, 200);
        assert_eq!(response.payload, Some(serde_json::json!({"id": 1, "name": "a"})));
    }

    #[tokio::test]
    async fn test_submit_empty_body_has_no_payload() {
        let transport = serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n").await;
        let op = Operation::new("extras_tags_delete", Method::DELETE, "/api/extras/tags/1/");

        let response = transport.submit(op).await.expect("submit");
        assert_eq!(response, ApiResponse::new(204, None));
    }

    #[tokio::test]
    async fn test_submit_maps_not_found() {
        let transport =
            serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nNot found").await;

        let err = transport.submit(read_op()).await.expect_err("404");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_submit_maps_authentication_failures() {
        for response in [
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            "HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ] {
            let transport = serve_once(response).await;
            let err = transport.submit(read_op()).await.expect_err("rejected");
            assert!(matches!(err, NetBoxError::Authentication(_)), "unexpected error: {err}");
        }
    }

    #[tokio::test]
    async fn test_submit_maps_other_failures_to_api_error() {
        let transport = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nboom",
        )
        .await;

        let err = transport.submit(read_op()).await.expect_err("500");
        assert!(matches!(err, NetBoxError::Api(ref m) if m.contains("500") && m.contains("boom")));
    }

    #[tokio::test]
    async fn test_submit_reports_undecodable_body() {
        let transport =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\nnot json").await;

        let err = transport.submit(read_op()).await.expect_err("invalid JSON");
        assert!(matches!(err, NetBoxError::Api(ref m) if m.contains("first 500 chars") && m.contains("not json")));
    }

    #[tokio::test]
    async fn test_submit_truncated_success_body_is_an_error() {
        let transport = serve_once(
            "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nContent-Length: 200\r\nConnection: close\r\n\r\n{\"id\": 1",
        )
        .await;
        let op = Operation::new("extras_tags_create", Method::POST, "/api/extras/tags/");

        let err = transport.submit(op).await.expect_err("body cut short");
        assert!(matches!(err, NetBoxError::Http(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = HttpTransport::new(Client::new(), "http://netbox:80/".to_string(), "t".to_string());
        assert_eq!(transport.base_url(), "http://netbox:80");
        assert_eq!(transport.build_url("/api/ipam/asns/"), "http://netbox:80/api/ipam/asns/");
    }

    #[test]
    fn test_build_url_keeps_absolute_urls() {
        let transport = HttpTransport::new(Client::new(), "http://netbox".to_string(), "t".to_string());
        assert_eq!(
            transport.build_url("https://other/api/ipam/asns/?offset=50"),
            "https://other/api/ipam/asns/?offset=50"
        );
    }

    #[test]
    fn test_auth_header() {
        let transport = HttpTransport::new(Client::new(), "http://netbox".to_string(), "abc123".to_string());
        assert_eq!(transport.auth_header(), "Token abc123");
    }
}
