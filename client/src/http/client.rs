//! HTTP client implementation

use reqwest::{header, Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::PlatformError;

/// HTTP client for backend communication
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        token: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self, PlatformError> {
        Url::parse(base_url)
            .map_err(|e| PlatformError::Validation(format!("Invalid base URL: {}", e)))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url).header(
            header::AUTHORIZATION,
            format!("Bearer {}", self.token.expose_secret()),
        )
    }

    /// Map a non-success response onto the error taxonomy
    async fn fail(response: Response) -> PlatformError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("HTTP request failed: {} - {}", status, body);

        match status {
            StatusCode::NOT_FOUND => PlatformError::NotFound(body),
            StatusCode::CONFLICT => PlatformError::Conflict(body),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                PlatformError::Validation(body)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PlatformError::Unauthorized(body),
            _ => PlatformError::RemoteUnavailable(format!("{}: {}", status, body)),
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PlatformError> {
        debug!("GET {}{}", self.base_url, path);
        let response = self.request(Method::GET, path).send().await?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PlatformError> {
        debug!("POST {}{}", self.base_url, path);
        let response = self.request(Method::POST, path).json(body).send().await?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PlatformError> {
        debug!("PUT {}{}", self.base_url, path);
        let response = self.request(Method::PUT, path).json(body).send().await?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PlatformError> {
        debug!("PATCH {}{}", self.base_url, path);
        let response = self.request(Method::PATCH, path).json(body).send().await?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a DELETE request; the response body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), PlatformError> {
        debug!("DELETE {}{}", self.base_url, path);
        let response = self.request(Method::DELETE, path).send().await?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        Ok(())
    }
}
