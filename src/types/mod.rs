//! Data types for the event statistics aggregator
//!
//! This module contains all the core data structures used throughout the
//! application.

mod event;
mod payload;
mod stats;

pub use event::{EventKind, EventRecord, NewEvent};
pub use payload::{InboundEvent, MessagePayload, NoticePayload, RequestPayload};
pub use stats::{
    GroupStats, PlatformBreakdown, RangeStats, SearchFilter, TotalStats, UserStats,
};
