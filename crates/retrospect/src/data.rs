//! Data structures shared between the Retrospect client and its backend.

use serde::{Deserialize, Serialize};

use crate::id::{ItemId, ParticipantId, SessionId};

/// Runtime configuration served by the backend at `/config`.
///
/// Fetched once after the root component mounts and immutable per fetch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub websocket_url: String,
    pub enable_analytics: bool,
}

/// A live retro session as pushed over the session channel.
///
/// Each inbound channel message carries a complete `Session` that supersedes
/// the previous one; there is no incremental merging.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub items: Vec<RetroItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

/// The column a retro item lives in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Happy,
    Meh,
    Sad,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RetroItem {
    pub id: ItemId,
    pub category: ItemCategory,
    pub description: String,
    #[serde(default)]
    pub votes: u32,
    #[serde(default)]
    pub done: bool,
}

/// Responsive-layout flags derived from the window width.
///
/// Recomputed on every resize event and once at mount; owned by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub is_mobile_640: bool,
    pub is_mobile_1030: bool,
}

impl ViewportState {
    /// Computes both breakpoint flags from the current window width.
    ///
    /// The 640 breakpoint is exclusive, the 1030 breakpoint inclusive.
    pub fn from_width(width: u32) -> Self {
        Self {
            is_mobile_640: width < 640,
            is_mobile_1030: width <= 1030,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints_at_sample_widths() {
        let narrow = ViewportState::from_width(500);
        assert!(narrow.is_mobile_640);
        assert!(narrow.is_mobile_1030);

        let medium = ViewportState::from_width(800);
        assert!(!medium.is_mobile_640);
        assert!(medium.is_mobile_1030);

        let wide = ViewportState::from_width(1200);
        assert!(!wide.is_mobile_640);
        assert!(!wide.is_mobile_1030);
    }

    #[test]
    fn test_breakpoint_boundaries() {
        // 640 is exclusive
        assert!(ViewportState::from_width(639).is_mobile_640);
        assert!(!ViewportState::from_width(640).is_mobile_640);

        // 1030 is inclusive
        assert!(ViewportState::from_width(1030).is_mobile_1030);
        assert!(!ViewportState::from_width(1031).is_mobile_1030);
    }

    #[test]
    fn test_config_deserializes_from_backend_shape() {
        let json = r#"{
            "api_base_url": "https://retro.example.com/api",
            "websocket_url": "wss://retro.example.com/cable",
            "enable_analytics": true
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_base_url, "https://retro.example.com/api");
        assert_eq!(config.websocket_url, "wss://retro.example.com/cable");
        assert!(config.enable_analytics);
    }

    #[test]
    fn test_session_deserializes_with_missing_collections() {
        // The channel may push a freshly created session before anyone joins.
        let json = r#"{"id": "Abc12345", "name": "Sprint 42"}"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.id.as_str(), "Abc12345");
        assert_eq!(session.name, "Sprint 42");
        assert!(session.participants.is_empty());
        assert!(session.items.is_empty());
    }

    #[test]
    fn test_session_round_trip() {
        let json = r#"{
            "id": "Abc12345",
            "name": "Sprint 42",
            "participants": [{"id": "p1", "name": "Dana"}],
            "items": [
                {"id": "i1", "category": "happy", "description": "Shipped it", "votes": 3, "done": false}
            ]
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.items[0].category, ItemCategory::Happy);
        assert_eq!(session.items[0].votes, 3);

        let back = serde_json::to_string(&session).unwrap();
        let again: Session = serde_json::from_str(&back).unwrap();
        assert_eq!(session, again);
    }
}
