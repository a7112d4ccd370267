//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the soft-navigation engine. Every field has a default, so a
/// partial `[navigation]` table in `site.toml` is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Length of each fade, in milliseconds.
    pub transition_duration_ms: u64,
    /// Links whose `href` contains any of these substrings load natively.
    pub exclude_patterns: Vec<String>,
    /// Attribute that opts a single link out of soft navigation.
    pub opt_out_attribute: String,
    /// Tag name of the primary-content landmark.
    pub landmark: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: 300,
            exclude_patterns: ["/assets/", "/images/", ".pdf", ".jpg", ".png", ".gif"]
                .into_iter()
                .map(String::from)
                .collect(),
            opt_out_attribute: "data-no-transition".to_string(),
            landmark: "main".to_string(),
        }
    }
}

impl NavigationConfig {
    /// Fade length as a [`Duration`].
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let config: NavigationConfig =
            serde_json::from_str(r#"{ "transition_duration_ms": 120 }"#).unwrap();
        assert_eq!(config.transition_duration(), Duration::from_millis(120));
        assert_eq!(config.landmark, "main");
        assert!(config.exclude_patterns.iter().any(|p| p == ".pdf"));
    }
}
