//! HTTP client for CalDAV operations.
//!
//! A thin blocking wrapper over reqwest handling:
//! - Basic and Digest authentication (401-triggered retry)
//! - PROPFIND and REPORT methods
//! - TLS configuration

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use tracing::{debug, trace, warn};

use crate::error::{ProviderError, ProviderResult};

use super::auth::{DigestAuth, basic_auth};
use super::config::CalDavConfig;

/// Blocking HTTP client for CalDAV operations.
pub struct CalDavClient {
    /// The underlying HTTP client.
    client: Client,
    /// Configuration.
    config: CalDavConfig,
    /// Cached digest auth state (for authentication continuity).
    digest_auth: Option<DigestAuth>,
}

impl CalDavClient {
    /// Creates a new CalDAV client with the given configuration.
    pub fn new(config: CalDavConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ProviderError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            digest_auth: None,
        })
    }

    /// Performs a PROPFIND request (calendar discovery).
    pub fn propfind(&mut self, url: &str, body: &str, depth: u8) -> ProviderResult<String> {
        self.request("PROPFIND", url, Some(body), Some(depth))
    }

    /// Performs a REPORT request (calendar-query).
    pub fn report(&mut self, url: &str, body: &str) -> ProviderResult<String> {
        self.request("REPORT", url, Some(body), Some(1))
    }

    /// Performs a GET request.
    pub fn get(&mut self, url: &str) -> ProviderResult<String> {
        self.request("GET", url, None, None)
    }

    /// Performs an HTTP request with an authentication retry on 401.
    fn request(
        &mut self,
        method: &str,
        url: &str,
        body: Option<&str>,
        depth: Option<u8>,
    ) -> ProviderResult<String> {
        let response = self.send_request(method, url, body, depth, None)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let www_auth = response
                .headers()
                .get("www-authenticate")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            if let Some(auth_header) = www_auth {
                debug!("received 401, retrying with authentication");

                if auth_header.starts_with("Digest ")
                    && let Some(digest) = DigestAuth::parse(&auth_header)
                {
                    self.digest_auth = Some(digest);
                    return self.send_authenticated(method, url, body, depth);
                }

                if auth_header.contains("Basic") || self.config.has_credentials() {
                    return self.send_authenticated(method, url, body, depth);
                }

                return Err(ProviderError::authentication(
                    "server requires authentication but offered no usable scheme",
                ));
            }
        }

        self.handle_response(response)
    }

    /// Sends a request, optionally with an Authorization header.
    fn send_request(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        depth: Option<u8>,
        authorization: Option<String>,
    ) -> ProviderResult<Response> {
        let http_method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| ProviderError::internal(format!("invalid HTTP method: {}", method)))?;

        let mut request = self.client.request(http_method, url);

        if body.is_some() {
            request = request.header("Content-Type", "application/xml; charset=utf-8");
        }
        if let Some(d) = depth {
            request = request.header("Depth", d.to_string());
        }
        if let Some(auth) = authorization {
            request = request.header("Authorization", auth);
        }
        if let Some(b) = body {
            request = request.body(b.to_string());
        }

        trace!(method = %method, url = %url, "sending request");

        request
            .send()
            .map_err(|e| ProviderError::network(format!("request failed: {}", e)))
    }

    /// Retries a request with credentials after a 401.
    fn send_authenticated(
        &mut self,
        method: &str,
        url: &str,
        body: Option<&str>,
        depth: Option<u8>,
    ) -> ProviderResult<String> {
        let (username, password) = match (&self.config.username, &self.config.password) {
            (Some(u), Some(p)) => (u.clone(), p.clone()),
            _ => {
                return Err(ProviderError::authentication(
                    "credentials required but not configured",
                ));
            }
        };

        let uri_path = url::Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| url.to_string());

        let auth_header = if let Some(ref mut digest) = self.digest_auth {
            digest.authorize(method, &uri_path, &username, &password)
        } else {
            basic_auth(&username, &password)
        };

        let response = self.send_request(method, url, body, depth, Some(auth_header))?;
        self.handle_response(response)
    }

    /// Maps the HTTP status to an error or extracts the body.
    fn handle_response(&self, response: Response) -> ProviderResult<String> {
        let status = response.status();
        trace!(status = %status, "received response");

        match status {
            StatusCode::OK | StatusCode::MULTI_STATUS => response
                .text()
                .map_err(|e| ProviderError::network(format!("failed to read response: {}", e))),
            StatusCode::UNAUTHORIZED => Err(ProviderError::authentication(
                "authentication failed: invalid credentials",
            )),
            StatusCode::FORBIDDEN => Err(ProviderError::authorization("access denied to calendar")),
            StatusCode::NOT_FOUND => {
                Err(ProviderError::not_found("calendar or resource not found"))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                Err(ProviderError::rate_limited("too many requests to server"))
            }
            s if s.is_server_error() => {
                let body = response.text().unwrap_or_default();
                Err(ProviderError::server(format!(
                    "server error ({}): {}",
                    s, body
                )))
            }
            s => {
                let body = response.text().unwrap_or_default();
                warn!(status = %s, body = %body, "unexpected response status");
                Err(ProviderError::invalid_response(format!(
                    "unexpected status {}: {}",
                    s, body
                )))
            }
        }
    }

    /// Returns the base URL from the configuration.
    pub fn base_url(&self) -> &str {
        self.config.url_str()
    }
}
