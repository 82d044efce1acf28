// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversation messages sent by end users or by the bot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};
use crate::user_id::UserId;

/// Maximum length of a message body, in characters. Longer bodies are truncated.
pub const MAX_MESSAGE_CHARS: usize = 1200;

/// Who produced a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
	/// Typed or tapped by the end user.
	#[default]
	User,
	/// Sent by the bot.
	Agent,
}

impl MessageKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			MessageKind::User => "user",
			MessageKind::Agent => "agent",
		}
	}
}

impl fmt::Display for MessageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MessageKind {
	type Err = RecordError;

	fn from_str(s: &str) -> Result<Self> {
		if s.eq_ignore_ascii_case("user") {
			Ok(MessageKind::User)
		} else if s.eq_ignore_ascii_case("agent") {
			Ok(MessageKind::Agent)
		} else {
			Err(RecordError::InvalidMessageKind(format!(
				"unknown message type '{s}', expected 'user' or 'agent'"
			)))
		}
	}
}

/// A single message in a conversation.
///
/// Messages are immutable once built. Use [`Message::builder`] to construct one
/// and [`Message::validate`] before sending; the client does the latter for you.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
	kind: MessageKind,
	user_id: UserId,
	platform: String,
	time_stamp: i64,
	message: Option<String>,
	intent: Option<String>,
	not_handled: bool,
	version: Option<String>,
	session_id: Option<String>,
}

impl Message {
	/// Starts building a user message for `user_id` on `platform`.
	pub fn builder(user_id: impl Into<UserId>, platform: impl Into<String>) -> MessageBuilder {
		MessageBuilder::new(user_id.into(), platform.into())
	}

	pub fn kind(&self) -> MessageKind {
		self.kind
	}

	pub fn user_id(&self) -> &UserId {
		&self.user_id
	}

	pub fn platform(&self) -> &str {
		&self.platform
	}

	/// Milliseconds since the UNIX epoch.
	pub fn time_stamp(&self) -> i64 {
		self.time_stamp
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	pub fn intent(&self) -> Option<&str> {
		self.intent.as_deref()
	}

	pub fn not_handled(&self) -> bool {
		self.not_handled
	}

	pub fn version(&self) -> Option<&str> {
		self.version.as_deref()
	}

	pub fn session_id(&self) -> Option<&str> {
		self.session_id.as_deref()
	}

	/// Checks the field combinations the API rejects.
	///
	/// Agent messages cannot be marked as not handled and cannot carry an intent.
	pub fn validate(&self) -> Result<()> {
		if self.kind == MessageKind::Agent {
			if self.not_handled {
				return Err(RecordError::InvalidMessageKind(
					"not_handled cannot be set on an agent message".to_string(),
				));
			}
			if self.intent.as_deref().is_some_and(|i| !i.is_empty()) {
				return Err(RecordError::InvalidMessageKind(
					"intent cannot be set on an agent message".to_string(),
				));
			}
		}
		Ok(())
	}
}

/// Builder for [`Message`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
	message: Message,
}

impl MessageBuilder {
	fn new(user_id: UserId, platform: String) -> Self {
		Self {
			message: Message {
				kind: MessageKind::User,
				user_id,
				platform,
				time_stamp: crate::now_millis(),
				message: None,
				intent: None,
				not_handled: false,
				version: None,
				session_id: None,
			},
		}
	}

	pub fn kind(mut self, kind: MessageKind) -> Self {
		self.message.kind = kind;
		self
	}

	/// Marks the message as sent by the bot.
	pub fn agent(self) -> Self {
		self.kind(MessageKind::Agent)
	}

	/// Sets the platform, e.g. `Telegram`, `Slack` or a custom name.
	pub fn platform(mut self, platform: impl Into<String>) -> Self {
		self.message.platform = platform.into();
		self
	}

	/// Overrides the timestamp (milliseconds since the UNIX epoch).
	pub fn time_stamp(mut self, millis: i64) -> Self {
		self.message.time_stamp = millis;
		self
	}

	/// Sets the raw message body, truncated to [`MAX_MESSAGE_CHARS`].
	pub fn message(mut self, text: impl Into<String>) -> Self {
		self.message.message = Some(truncate(text.into()));
		self
	}

	/// Sets the intent. User messages only.
	pub fn intent(mut self, intent: impl Into<String>) -> Self {
		self.message.intent = Some(intent.into());
		self
	}

	/// Marks the message as not understood or not supported. User messages only.
	pub fn not_handled(mut self, not_handled: bool) -> Self {
		self.message.not_handled = not_handled;
		self
	}

	/// Sets the bot version, for tracking releases or A/B tests.
	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.message.version = Some(version.into());
		self
	}

	/// Sets a custom session id.
	pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
		self.message.session_id = Some(session_id.into());
		self
	}

	pub fn build(self) -> Message {
		self.message
	}
}

fn truncate(mut text: String) -> String {
	if let Some((idx, _)) = text.char_indices().nth(MAX_MESSAGE_CHARS) {
		text.truncate(idx);
	}
	text
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_kind_parses_known_values() {
		assert_eq!("user".parse::<MessageKind>().unwrap(), MessageKind::User);
		assert_eq!("AGENT".parse::<MessageKind>().unwrap(), MessageKind::Agent);
	}

	#[test]
	fn test_kind_rejects_unknown_values() {
		let err = "agent007".parse::<MessageKind>().unwrap_err();
		assert!(matches!(err, RecordError::InvalidMessageKind(_)));
	}

	#[test]
	fn test_builder_defaults() {
		let msg = Message::builder("123456", "Telegram").build();
		assert_eq!(msg.kind(), MessageKind::User);
		assert_eq!(msg.user_id(), &UserId::from("123456"));
		assert_eq!(msg.platform(), "Telegram");
		assert!(!msg.not_handled());
		assert!(msg.message().is_none());
		assert!(msg.time_stamp() > 0);
	}

	#[test]
	fn test_not_handled_agent_message_fails() {
		let msg = Message::builder("123456", "Telegram")
			.agent()
			.not_handled(true)
			.message("hello")
			.version("1.0")
			.build();

		assert!(matches!(
			msg.validate(),
			Err(RecordError::InvalidMessageKind(_))
		));
	}

	#[test]
	fn test_intent_in_agent_message_fails() {
		let msg = Message::builder("123456", "Telegram")
			.agent()
			.intent("/start")
			.build();

		assert!(matches!(
			msg.validate(),
			Err(RecordError::InvalidMessageKind(_))
		));
	}

	#[test]
	fn test_not_handled_user_message_is_valid() {
		let msg = Message::builder("123456", "Telegram")
			.intent("order drink")
			.not_handled(true)
			.build();
		assert!(msg.validate().is_ok());
	}

	#[test]
	fn test_long_message_is_truncated() {
		let msg = Message::builder("123456", "Telegram")
			.intent("/start")
			.message("a".repeat(MAX_MESSAGE_CHARS + 1))
			.build();

		assert!(msg.validate().is_ok());
		assert_eq!(msg.message().unwrap().chars().count(), MAX_MESSAGE_CHARS);
	}

	#[test]
	fn test_truncation_respects_char_boundaries() {
		let msg = Message::builder("1", "Web")
			.message("é".repeat(MAX_MESSAGE_CHARS + 10))
			.build();
		assert_eq!(msg.message().unwrap().chars().count(), MAX_MESSAGE_CHARS);
	}

	proptest! {
		#[test]
		fn test_truncation_keeps_prefix(text in ".{0,1500}") {
			let msg = Message::builder("1", "Web").message(text.clone()).build();
			let body = msg.message().unwrap();

			prop_assert!(body.chars().count() <= MAX_MESSAGE_CHARS);
			prop_assert!(text.starts_with(body));
			if text.chars().count() <= MAX_MESSAGE_CHARS {
				prop_assert_eq!(body, text.as_str());
			}
		}
	}
}
