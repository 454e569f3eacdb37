//! Configuration for the RT client.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `server` | `http://localhost` | Base URL of the RT installation |
//! | `username` / `password` | empty | Login-form credentials |
//! | `timeout_secs` | 30 | Per-request timeout |
//! | `user_agent` | `rt-rest/<version>` | User-Agent header |
//!
//! # Examples
//!
//! ```
//! use rt_rest::client::ClientConfig;
//!
//! let config = ClientConfig::new("http://rt.example.org", "admin", "password");
//! assert_eq!(config.timeout_secs, 30);
//! ```

/// Configuration for [`RtClient`](crate::client::RtClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the RT installation, without the `/REST/1.0` suffix.
    pub server: String,

    /// Username for the login form.
    pub username: String,

    /// Password for the login form.
    pub password: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent on every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration with the given server and credentials, defaults elsewhere.
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ClientConfig {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server: "http://localhost".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
            user_agent: concat!("rt-rest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server, "http://localhost");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("rt-rest/"));
    }

    #[test]
    fn test_new_overrides_credentials() {
        let config = ClientConfig::new("http://rt.example.org", "admin", "secret");
        assert_eq!(config.server, "http://rt.example.org");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "secret");
        assert_eq!(config.timeout_secs, 30);
    }
}
