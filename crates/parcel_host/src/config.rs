//! Upload runtime configuration.
//!
//! Pages may embed `<script type="application/json" id="parcel-upload-config">` to override any
//! field; everything missing falls back to the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// DOM id of the optional configuration script element.
pub const UPLOAD_CONFIG_SCRIPT_ID: &str = "parcel-upload-config";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration loading failures.
pub enum ConfigError {
    /// The selector matched nothing, or matched a non-`<script>` element.
    #[error("selector `{0}` did not match any <script> elements")]
    MissingScript(String),
    /// The script body is not a valid configuration document.
    #[error("failed to parse JSON from <script> element: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Bounded retry used while waiting for a freshly inserted surface to mount.
pub struct HandoffPolicy {
    /// Delay between anchor lookups.
    pub interval_ms: u64,
    /// Number of lookups before giving up.
    pub max_attempts: u32,
}

impl Default for HandoffPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            max_attempts: 10,
        }
    }
}

impl HandoffPolicy {
    /// Delay between anchor lookups.
    pub fn interval(self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Endpoints, selectors, and form field names used by the upload runtime.
pub struct UploadConfig {
    /// POST target for upload submissions.
    pub endpoint: String,
    /// GET endpoint rendering a new upload surface.
    pub surface_url: String,
    /// Selector matching a mounted or pending upload surface.
    pub surface_selector: String,
    /// Selector matching a surface's drop anchor.
    pub anchor_selector: String,
    /// DOM id of the page drop indicator.
    pub indicator_id: String,
    /// Selector of the list view refreshed after a completed upload.
    pub refresh_target: String,
    /// Event name fired at the refresh target.
    pub refresh_event: String,
    /// DOM id of the team identifier script element.
    pub team_identifier_id: String,
    /// Form field carrying the authenticity token.
    pub csrf_field: String,
    /// Form field used for each file part.
    pub file_field: String,
    /// Form field carrying the team id, when present.
    pub team_field: String,
    /// Surface handoff retry policy.
    pub handoff: HandoffPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: "/uploads/new".to_string(),
            surface_url: "/uploads/new".to_string(),
            surface_selector: "parcel-upload-form".to_string(),
            anchor_selector: "parcel-upload-form > .event-receiver".to_string(),
            indicator_id: "drop-indicator".to_string(),
            refresh_target: "#upload-list-refresh".to_string(),
            refresh_event: "refresh".to_string(),
            team_identifier_id: "team-identifier".to_string(),
            csrf_field: "csrf_token".to_string(),
            file_field: "file".to_string(),
            team_field: "team".to_string(),
            handoff: HandoffPolicy::default(),
        }
    }
}

impl UploadConfig {
    /// Parses a configuration document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when `raw` is not a JSON object of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// URL asking the server for a surface that skips its entrance animation.
    pub fn surface_request_url(&self, team: Option<&str>) -> String {
        let separator = if self.surface_url.contains('?') {
            '&'
        } else {
            '?'
        };
        let mut url = format!("{}{separator}immediate=true", self.surface_url);
        if let Some(team) = team {
            url.push_str("&team=");
            url.push_str(&urlencoding::encode(team));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let config =
            UploadConfig::from_json(r#"{"endpoint":"/api/uploads","handoff":{"max_attempts":3}}"#)
                .expect("config");

        assert_eq!(config.endpoint, "/api/uploads");
        assert_eq!(config.handoff.max_attempts, 3);
        assert_eq!(config.handoff.interval_ms, 100);
        assert_eq!(config.anchor_selector, "parcel-upload-form > .event-receiver");
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            UploadConfig::from_json("[1,2]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn surface_url_carries_immediate_and_team() {
        let config = UploadConfig::default();
        assert_eq!(
            config.surface_request_url(None),
            "/uploads/new?immediate=true"
        );
        assert_eq!(
            config.surface_request_url(Some("team 7")),
            "/uploads/new?immediate=true&team=team%207"
        );
        assert_eq!(
            config.surface_request_url(Some("a&b=c/d")),
            "/uploads/new?immediate=true&team=a%26b%3Dc%2Fd"
        );
    }
}
