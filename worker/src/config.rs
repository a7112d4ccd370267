//! Worker configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the offline worker. Every field has a default, so a partial
/// `[worker]` table in `site.toml` is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Cache name prefix; the current cache is `<prefix>-<version>`.
    pub cache_prefix: String,
    /// Version token. Bumping it evicts every older cache on activation.
    pub version: String,
    /// Root-relative paths precached on install, in order.
    pub manifest: Vec<String>,
    /// Document served to HTML requests when both cache and network fail.
    pub offline_fallback: String,
    /// Requests whose URL contains any of these are never intercepted.
    pub passthrough_markers: Vec<String>,
    /// URL schemes that are never intercepted.
    pub extension_schemes: Vec<String>,
    /// Call skip-waiting automatically after a successful install.
    pub skip_waiting_on_install: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_prefix: "danisphotography".to_string(),
            version: "v1".to_string(),
            manifest: [
                "/",
                "/index.html",
                "/css/style.css",
                "/js/script.js",
                "/favicon-32x32.png",
                "/favicon-16x16.png",
                "/apple-touch-icon.png",
                "/site.webmanifest",
                "/offline.html",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            offline_fallback: "/offline.html".to_string(),
            passthrough_markers: vec![
                "google-analytics".to_string(),
                "googletagmanager".to_string(),
            ],
            extension_schemes: vec![
                "chrome-extension".to_string(),
                "moz-extension".to_string(),
                "safari-web-extension".to_string(),
            ],
            skip_waiting_on_install: true,
        }
    }
}

impl WorkerConfig {
    /// The one current cache name.
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.cache_prefix, self.version)
    }
}
