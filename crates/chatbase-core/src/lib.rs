// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Chatbase analytics API.
//!
//! This crate holds everything that does not touch the network:
//! - Records ([`Message`], [`Click`], [`Event`]) and their validation rules
//! - Wire payloads rendered from records plus the bot's API key
//! - Response shapes returned by the API, including the bulk message response
//!
//! The async client lives in the `chatbase` crate.

pub mod click;
pub mod error;
pub mod event;
pub mod message;
pub mod payload;
pub mod record;
pub mod response;
pub mod user_id;

pub use click::Click;
pub use error::RecordError;
pub use event::{Event, EventBuilder, Property, PropertyValue};
pub use message::{Message, MessageBuilder, MessageKind, MAX_MESSAGE_CHARS};
pub use payload::{BatchPayload, ClickPayload, EventPayload, MessagePayload, PropertyPayload};
pub use record::{Record, RecordKind};
pub use response::{
	BatchItemResponse, BatchOutcome, BatchResponse, ErrorResponse, EventResponse, MessageId,
	MessageResponse, INVALID_API_KEY_REASON,
};
pub use user_id::UserId;

/// Returns the current time as milliseconds since the UNIX epoch.
pub(crate) fn now_millis() -> i64 {
	chrono::Utc::now().timestamp_millis()
}
