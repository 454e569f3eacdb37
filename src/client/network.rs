//! Reqwest-backed transport.
//!
//! Holds the `reqwest` client with its cookie store. The session cookie RT
//! hands out at login is the only authentication state, and it lives here,
//! not in the adapter.

use crate::client::config::ClientConfig;
use crate::error::{Result, RtError};
use crate::traits::Transport;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Production [`Transport`] over `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    server: Url,
}

impl ReqwestTransport {
    /// Build a transport from configuration.
    ///
    /// Fails with [`RtError::Config`] when the server URL does not parse.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let server = Url::parse(&config.server)
            .map_err(|e| RtError::Config(format!("invalid server URL {:?}: {e}", config.server)))?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RtError::Config(e.to_string()))?;

        Ok(ReqwestTransport { client, server })
    }

    fn rest_url(&self, path: &str) -> Result<Url> {
        let joined = format!("{}/REST/1.0{}", self.server.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| RtError::Config(format!("invalid path {path:?}: {e}")))
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        response
            .text()
            .await
            .map_err(|e| RtError::Http(e.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .get(self.rest_url(path)?)
            .query(query)
            .send()
            .await
            .map_err(|e| RtError::Http(e.to_string()))?;
        Self::read_body(response).await
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .post(self.rest_url(path)?)
            .form(form)
            .send()
            .await
            .map_err(|e| RtError::Http(e.to_string()))?;
        Self::read_body(response).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<()> {
        // The login form lives at the server root, outside the REST base.
        let url = self
            .server
            .join("/index.html")
            .map_err(|e| RtError::Config(e.to_string()))?;
        self.client
            .post(url)
            .form(&[("user", username), ("pass", password)])
            .send()
            .await
            .map_err(|e| RtError::Http(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_server_url() {
        let config = ClientConfig::new("not a url", "user", "pass");
        assert!(matches!(
            ReqwestTransport::new(&config),
            Err(RtError::Config(_))
        ));
    }

    #[test]
    fn test_rest_url_joins_base() {
        let config = ClientConfig::new("http://rt.example.org", "user", "pass");
        let transport = ReqwestTransport::new(&config).unwrap();
        let url = transport.rest_url("/ticket/1/show").unwrap();
        assert_eq!(url.as_str(), "http://rt.example.org/REST/1.0/ticket/1/show");
    }

    #[test]
    fn test_rest_url_tolerates_trailing_slash() {
        let config = ClientConfig::new("http://rt.example.org/", "user", "pass");
        let transport = ReqwestTransport::new(&config).unwrap();
        let url = transport.rest_url("/ticket/1/show").unwrap();
        assert_eq!(url.as_str(), "http://rt.example.org/REST/1.0/ticket/1/show");
    }
}
