//! HTTP Server Configuration
//!
//! Bind address, API root prefix, and CORS settings for the gateway.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8088)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for every route, without trailing slash (default: "")
    #[serde(default)]
    pub api_root: String,

    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8088
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_root: String::new(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Set the API root, dropping any trailing slashes
    pub fn with_api_root(mut self, api_root: &str) -> Self {
        self.api_root = normalize_api_root(api_root);
        self
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of a route under the API root
    pub fn route(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }
}

/// `"/api/"` and `"/api"` both mean `"/api"`; `"/"` means no prefix.
pub fn normalize_api_root(api_root: &str) -> String {
    api_root.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8088);
        assert_eq!(config.api_root, "");
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_api_root_trailing_slash() {
        assert_eq!(normalize_api_root("/cookie/"), "/cookie");
        assert_eq!(normalize_api_root("/"), "");
        assert_eq!(normalize_api_root(""), "");
    }

    #[test]
    fn test_route() {
        let config = HttpServerConfig::default().with_api_root("/cookie/");
        assert_eq!(config.route("/update"), "/cookie/update");
        assert_eq!(HttpServerConfig::default().route("/"), "/");
    }

    #[test]
    fn test_serde_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
    }
}
