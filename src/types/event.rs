//! Event types for the statistics aggregator
//!
//! An [`EventRecord`] is an immutable snapshot of one event observed on the
//! adapter bus. Records live in the recency buffer and in the persisted
//! snapshot; they are never mutated after ingestion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three event categories tracked by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A chat message delivered by an adapter
    Message,
    /// A platform notice (join/leave, recall, poke, ...)
    Notice,
    /// A friend/group request awaiting approval
    Request,
}

impl EventKind {
    /// String form used in logs and stored snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Message => "message",
            EventKind::Notice => "notice",
            EventKind::Request => "request",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record of one observed event
///
/// `record_id` carries the platform message id for message/notice events and
/// the request id for request events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event category
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Originating adapter platform (`"unknown"` when the payload omits it)
    pub platform: String,

    /// Ingestion wall-clock time (RFC 3339 when serialized)
    pub timestamp: DateTime<Utc>,

    /// Platform-specific sub-type (private/group message, kind of notice, ...)
    pub detail_type: String,

    /// User the event originated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Group the event occurred in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Plain-text rendering of the event content, used for keyword search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_message: Option<String>,

    /// Message or request identifier, depending on `kind`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl EventRecord {
    /// Build a record from ingest input, stamping the given time and
    /// applying the defaulting rules for absent fields
    pub fn from_input(input: NewEvent, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: input.kind,
            platform: input.platform.unwrap_or_else(|| "unknown".to_string()),
            timestamp,
            detail_type: input.detail_type.unwrap_or_else(|| "unknown".to_string()),
            user_id: input.user_id,
            group_id: input.group_id,
            alt_message: input.alt_message,
            record_id: input.record_id,
        }
    }
}

/// Input to [`ingest`](crate::aggregator::AggregatorService::ingest)
///
/// Every field except `kind` is optional; missing `platform` and
/// `detail_type` default to `"unknown"` so that a sparse payload is counted
/// rather than rejected.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub kind: EventKind,
    pub platform: Option<String>,
    pub detail_type: Option<String>,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub alt_message: Option<String>,
    pub record_id: Option<String>,
}

impl NewEvent {
    /// Create an input with only the kind set
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            platform: None,
            detail_type: None,
            user_id: None,
            group_id: None,
            alt_message: None,
            record_id: None,
        }
    }

    /// Set the originating platform
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the detail type
    pub fn with_detail_type(mut self, detail_type: impl Into<String>) -> Self {
        self.detail_type = Some(detail_type.into());
        self
    }

    /// Set the originating user
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the group the event occurred in
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set the searchable text content
    pub fn with_alt_message(mut self, alt_message: impl Into<String>) -> Self {
        self.alt_message = Some(alt_message.into());
        self
    }

    /// Set the message/request identifier
    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }
}
