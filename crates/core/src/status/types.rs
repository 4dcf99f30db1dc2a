//! Types for OA status lookups.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Open-access status categories, as reported by Unpaywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OaStatus {
    /// Published open access in a fully-OA journal.
    Gold,
    /// A repository copy is available.
    Green,
    /// Free to read on the publisher site, no open license.
    Bronze,
    /// Open access in an otherwise subscription journal.
    Hybrid,
    /// Subscription required.
    Closed,
    /// The status service has no record for this identifier.
    Unknown,
    /// The lookup itself failed.
    Error,
}

impl OaStatus {
    /// Whether this category means a free copy exists.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            OaStatus::Gold | OaStatus::Green | OaStatus::Bronze | OaStatus::Hybrid
        )
    }

    /// Parse a status string from the service, defaulting to `Closed` for
    /// anything unrecognized (a missing status also means closed).
    pub fn parse_or_closed(s: &str) -> Self {
        match s {
            "gold" => OaStatus::Gold,
            "green" => OaStatus::Green,
            "bronze" => OaStatus::Bronze,
            "hybrid" => OaStatus::Hybrid,
            "closed" => OaStatus::Closed,
            "unknown" => OaStatus::Unknown,
            _ => OaStatus::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OaStatus::Gold => "gold",
            OaStatus::Green => "green",
            OaStatus::Bronze => "bronze",
            OaStatus::Hybrid => "hybrid",
            OaStatus::Closed => "closed",
            OaStatus::Unknown => "unknown",
            OaStatus::Error => "error",
        }
    }
}

/// Location of the best open-access copy, when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OaLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_for_pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Normalized result of an OA status lookup for one DOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OaRecord {
    pub status: OaStatus,
    pub is_oa: bool,
    /// Present only when the service reported an open-access copy location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_oa_location: Option<OaLocation>,
    pub journal_is_oa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OaRecord {
    /// Record for a DOI the status service does not know about. This is an
    /// expected condition, not a failure.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            status: OaStatus::Unknown,
            is_oa: false,
            best_oa_location: None,
            journal_is_oa: false,
            error: Some(reason.into()),
        }
    }

    /// Record for a lookup that failed outright (transport or 5xx-class).
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: OaStatus::Error,
            is_oa: false,
            best_oa_location: None,
            journal_is_oa: false,
            error: Some(message.into()),
        }
    }
}

/// Errors from the OA status service.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Non-2xx response other than the domain not-found code.
    #[error("Status service error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_open() {
        assert!(OaStatus::Gold.is_open());
        assert!(OaStatus::Green.is_open());
        assert!(OaStatus::Bronze.is_open());
        assert!(OaStatus::Hybrid.is_open());
        assert!(!OaStatus::Closed.is_open());
        assert!(!OaStatus::Unknown.is_open());
        assert!(!OaStatus::Error.is_open());
    }

    #[test]
    fn test_parse_defaults_to_closed() {
        assert_eq!(OaStatus::parse_or_closed("gold"), OaStatus::Gold);
        assert_eq!(OaStatus::parse_or_closed("diamond"), OaStatus::Closed);
        assert_eq!(OaStatus::parse_or_closed(""), OaStatus::Closed);
    }

    #[test]
    fn test_serde_roundtrip() {
        let record = OaRecord {
            status: OaStatus::Green,
            is_oa: true,
            best_oa_location: Some(OaLocation {
                url: Some("https://repo.example/paper.pdf".into()),
                url_for_pdf: None,
                host_type: Some("repository".into()),
                license: Some("cc-by".into()),
                version: Some("acceptedVersion".into()),
            }),
            journal_is_oa: false,
            error: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "green");
        let back: OaRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
