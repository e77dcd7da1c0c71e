//! Inbound adapter payloads
//!
//! The messaging adapter delivers one structured payload per event. Every
//! field is optional here: the ingestion boundary is total, and whatever the
//! payload omits is filled in by the defaulting rules in
//! [`EventRecord::from_input`](super::event::EventRecord::from_input).
//!
//! Request payloads name their fields differently from message/notice
//! payloads (`comment` instead of `alt_message`, `request_id` instead of
//! `message_id`); the mapping into [`NewEvent`] normalizes that.

use serde::Deserialize;

use super::event::{EventKind, NewEvent};

/// Payload of a `message` event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub alt_message: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Payload of a `notice` event (some notices carry message content too)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticePayload {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub alt_message: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Payload of a `request` event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestPayload {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    /// Free-text note attached to the request
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// One event as delivered by the adapter, tagged by kind
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message(MessagePayload),
    Notice(NoticePayload),
    Request(RequestPayload),
}

impl InboundEvent {
    /// The event category this payload belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::Message(_) => EventKind::Message,
            InboundEvent::Notice(_) => EventKind::Notice,
            InboundEvent::Request(_) => EventKind::Request,
        }
    }

    /// Normalize the payload into ingest input
    pub fn into_new_event(self) -> NewEvent {
        match self {
            InboundEvent::Message(p) => NewEvent {
                kind: EventKind::Message,
                platform: p.platform,
                detail_type: p.detail_type,
                user_id: p.user_id,
                group_id: p.group_id,
                alt_message: p.alt_message,
                record_id: p.message_id,
            },
            InboundEvent::Notice(p) => NewEvent {
                kind: EventKind::Notice,
                platform: p.platform,
                detail_type: p.detail_type,
                user_id: p.user_id,
                group_id: p.group_id,
                alt_message: p.alt_message,
                record_id: p.message_id,
            },
            InboundEvent::Request(p) => NewEvent {
                kind: EventKind::Request,
                platform: p.platform,
                detail_type: p.detail_type,
                user_id: p.user_id,
                group_id: p.group_id,
                alt_message: p.comment,
                record_id: p.request_id,
            },
        }
    }
}
