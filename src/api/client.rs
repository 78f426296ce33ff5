//! Authenticated HTTP client for aw-server
//!
//! Wraps reqwest::Client with bearer token injection and an error hook that
//! forwards server error messages to the global store.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{error_message, ApiError};
use crate::config::Config;
use crate::store::GlobalStore;

/// Client for the aw-server REST API (`{origin}/api/...`).
pub struct AwClient {
    http: reqwest::Client,
    base: Url,
    token: RwLock<Option<String>>,
    global: GlobalStore,
}

impl AwClient {
    /// Build a client for `origin` (scheme://host:port). The `/api` prefix is appended.
    pub fn new(
        origin: &str,
        client_name: &str,
        timeout: Duration,
        global: GlobalStore,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(&format!("{}/api", origin.trim_end_matches('/')))
            .map_err(|_| ApiError::InvalidUrl(origin.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(origin.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", client_name, env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport {
                url: base.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base,
            token: RwLock::new(None),
            global,
        })
    }

    /// Build a client from configuration.
    pub fn from_config(config: &Config, global: GlobalStore) -> Result<Self, ApiError> {
        let origin = config.server_origin();
        tracing::debug!("Using server {} (testing: {})", origin, config.testing);
        Self::new(
            &origin,
            &config.client_name,
            Duration::from_secs(config.request_timeout_secs),
            global,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Send `Authorization: Bearer {token}` on every following request.
    pub fn set_token(&self, token: &str) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.to_string());
    }

    pub fn clear_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Absolute URL for the given path segments under `/api`.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        let token = self.token.read().unwrap_or_else(|e| e.into_inner());
        match token.as_deref() {
            Some(t) => builder.bearer_auth(t),
            None => builder,
        }
    }

    /// Send a request and run the response through the error hook.
    pub async fn send(
        &self,
        method: Method,
        segments: &[&str],
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let url = self.url(segments);
        tracing::debug!("{} {}", method, url);

        let resp = match configure(self.request(method, url.clone())).send().await {
            Ok(resp) => resp,
            Err(source) => {
                self.global
                    .set_message(format!("Could not reach server at {}", self.base));
                return Err(ApiError::Transport {
                    url: url.to_string(),
                    source,
                });
            }
        };

        self.check_response(resp).await
    }

    /// Send and decode a JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.send(method, segments, configure).await?;
        let url = resp.url().to_string();
        resp.json()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    /// Non-success responses: the message goes to the global store and the call fails.
    async fn check_response(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::warn!("HTTP {} for {}: {}", status.as_u16(), url, message);
        self.global.set_message(message.clone());

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
