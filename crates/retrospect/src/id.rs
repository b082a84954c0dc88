//! ID generation utilities for the Retrospect application.
//!
//! This module provides type-safe ID generation using the `tiny_id` crate,
//! with specific ID types for the entities that flow over the session
//! channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use std::sync::Mutex;
use tiny_id::ShortCodeGenerator;

/// Type alias for a lazy-initialized short code generator with a mutex for
/// thread safety, so a global generator can be shared without passing it
/// around explicitly.
type LazyShortCodeGenerator = LazyLock<Mutex<ShortCodeGenerator<char>>>;

// tiny_id generators need mutable access, so we wrap in Mutex
static SESSION_ID_GENERATOR: LazyShortCodeGenerator = LazyLock::new(|| {
    // Alphanumeric minus characters that read ambiguously in shared URLs
    let alphabet: Vec<char> = "123456789ABCDEFGHJKMNPQRSTUVWXYZabcdefghkmnpqrstuvwxyz"
        .chars()
        .collect();
    Mutex::new(ShortCodeGenerator::with_alphabet(alphabet, 8))
});

static SHORT_ID_GENERATOR: LazyShortCodeGenerator = LazyLock::new(|| {
    let alphabet: Vec<char> = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"
        .chars()
        .collect();
    Mutex::new(ShortCodeGenerator::with_alphabet(alphabet, 6))
});

/// A type-safe wrapper around string IDs.
///
/// Prevents mixing IDs of different entities while serializing as a plain
/// string on the wire.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: std::marker::PhantomData<T>,
}

// Custom serde implementation to serialize as just a string
impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_string(value))
    }
}

impl<T> Id<T> {
    /// Creates a new ID with the given value.
    pub fn from_string(value: String) -> Self {
        Self {
            value,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the string value of the ID.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes the ID and returns the inner string value.
    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::from_string(value.to_string())
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

// Type markers for different entity types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionMarker;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantMarker;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemMarker;

/// Type alias for Session IDs
pub type SessionId = Id<SessionMarker>;

/// Type alias for Participant IDs
pub type ParticipantId = Id<ParticipantMarker>;

/// Type alias for Retro Item IDs
pub type ItemId = Id<ItemMarker>;

impl SessionId {
    /// Generates a new session ID with a user-friendly format
    /// (8 characters, no visually ambiguous characters).
    pub fn new() -> Self {
        let mut generator = SESSION_ID_GENERATOR.lock().unwrap();
        Self {
            value: generator.next_string(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl ParticipantId {
    /// Generates a new participant ID (6 characters, internal use).
    pub fn new() -> Self {
        let mut generator = SHORT_ID_GENERATOR.lock().unwrap();
        Self {
            value: generator.next_string(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 8);
        assert_eq!(id2.as_str().len(), 8);
    }

    #[test]
    fn test_id_creation() {
        let id = SessionId::from_string("test123".to_string());
        assert_eq!(id.as_str(), "test123");
        assert_eq!(id.to_string(), "test123");
    }

    #[test]
    fn test_id_from_string() {
        let id: SessionId = "abc123".into();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_session_id_format() {
        let id = SessionId::new();
        assert_eq!(id.as_str().len(), 8);

        // Should not contain ambiguous characters
        let confusing_chars = "0OIl";
        assert!(!id.as_str().chars().any(|c| confusing_chars.contains(c)));
    }

    #[test]
    fn test_type_safety() {
        let session_id = SessionId::new();
        let participant_id = ParticipantId::new();

        // This should compile - same ID type
        let _same_session: SessionId = session_id.clone();

        // This would not compile - different ID types
        // let _wrong_type: ParticipantId = session_id;

        let _used = participant_id.as_str();
    }

    #[test]
    fn test_serde() {
        let original = SessionId::from_string("test123".to_string());

        let serialized = serde_json::to_string(&original).unwrap();
        assert_eq!(serialized, "\"test123\"");

        let deserialized: SessionId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(original, deserialized);
    }
}
