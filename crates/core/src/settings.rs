//! User-facing lookup settings.

use serde::{Deserialize, Serialize};

use crate::status::OaStatus;

/// Read-only settings the pipeline consults per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Contact email sent to both external services (polite-pool etiquette).
    pub contact_email: String,
    /// Master switch; a disabled pipeline does no I/O at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Statuses worth surfacing to the renderer.
    #[serde(default = "default_visible_statuses")]
    pub visible_statuses: Vec<OaStatus>,
}

fn default_enabled() -> bool {
    true
}

fn default_visible_statuses() -> Vec<OaStatus> {
    vec![
        OaStatus::Gold,
        OaStatus::Green,
        OaStatus::Bronze,
        OaStatus::Hybrid,
    ]
}

impl Settings {
    pub fn new(contact_email: impl Into<String>) -> Self {
        Self {
            contact_email: contact_email.into(),
            enabled: default_enabled(),
            visible_statuses: default_visible_statuses(),
        }
    }

    pub fn is_visible(&self, status: OaStatus) -> bool {
        self.visible_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_show_open_statuses_only() {
        let settings = Settings::new("oa@example.org");
        assert!(settings.enabled);
        assert!(settings.is_visible(OaStatus::Gold));
        assert!(settings.is_visible(OaStatus::Hybrid));
        assert!(!settings.is_visible(OaStatus::Closed));
        assert!(!settings.is_visible(OaStatus::Unknown));
    }

    #[test]
    fn test_deserializes_with_missing_optional_fields() {
        let settings: Settings =
            serde_json::from_str(r#"{"contact_email": "oa@example.org"}"#).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.visible_statuses.len(), 4);
    }
}
