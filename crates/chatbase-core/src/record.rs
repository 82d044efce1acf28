// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A single unit of telemetry, whatever its kind.

use std::fmt;

use crate::click::Click;
use crate::error::Result;
use crate::event::Event;
use crate::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
	Message,
	Click,
	Event,
}

impl fmt::Display for RecordKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			RecordKind::Message => "message",
			RecordKind::Click => "click",
			RecordKind::Event => "event",
		};
		f.write_str(s)
	}
}

/// A message, click or event ready to be registered.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
	Message(Message),
	Click(Click),
	Event(Event),
}

impl Record {
	pub fn kind(&self) -> RecordKind {
		match self {
			Record::Message(_) => RecordKind::Message,
			Record::Click(_) => RecordKind::Click,
			Record::Event(_) => RecordKind::Event,
		}
	}

	/// Validates the record. Only messages carry rules; clicks and events always pass.
	pub fn validate(&self) -> Result<()> {
		match self {
			Record::Message(m) => m.validate(),
			Record::Click(_) | Record::Event(_) => Ok(()),
		}
	}
}

impl From<Message> for Record {
	fn from(m: Message) -> Self {
		Record::Message(m)
	}
}

impl From<Click> for Record {
	fn from(c: Click) -> Self {
		Record::Click(c)
	}
}

impl From<Event> for Record {
	fn from(e: Event) -> Self {
		Record::Event(e)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RecordError;

	#[test]
	fn test_kind_matches_variant() {
		let record: Record = Click::new("google.com", "Web").into();
		assert_eq!(record.kind(), RecordKind::Click);
		assert_eq!(record.kind().to_string(), "click");

		let record: Record = Event::builder(1, "signup").build().into();
		assert_eq!(record.kind(), RecordKind::Event);
	}

	#[test]
	fn test_validate_delegates_to_message() {
		let record: Record = Message::builder("1", "Web")
			.agent()
			.not_handled(true)
			.build()
			.into();
		assert!(matches!(
			record.validate(),
			Err(RecordError::InvalidMessageKind(_))
		));
	}
}
