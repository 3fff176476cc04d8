//! HTTP Server Configuration

use std::path::PathBuf;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Address to bind to (default: "0.0.0.0:8000")
    pub bind: String,
    /// Directory the front-end assets are served from; created at startup if missing
    pub static_dir: PathBuf,
    /// URL prefix the static directory is mounted under
    pub static_prefix: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            static_dir: PathBuf::from("static"),
            static_prefix: "/ui".to_string(),
        }
    }
}

impl HttpServerConfig {
    /// Document the root path redirects to.
    #[must_use]
    pub fn entry_page(&self) -> String {
        format!("{}/index.html", self.static_prefix.trim_end_matches('/'))
    }
}
