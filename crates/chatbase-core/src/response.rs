// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Response bodies returned by the Chatbase API.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reason the API gives when the `api_key` field is missing or unknown.
pub const INVALID_API_KEY_REASON: &str =
	"Error fetching parameter 'api_key': Missing or invalid field(s): 'api_key'";

/// Identifier the API assigns to a registered message.
///
/// Single-message responses return it as a string, bulk responses as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
	Number(u64),
	Text(String),
}

impl fmt::Display for MessageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MessageId::Number(n) => write!(f, "{n}"),
			MessageId::Text(s) => f.write_str(s),
		}
	}
}

impl From<u64> for MessageId {
	fn from(n: u64) -> Self {
		MessageId::Number(n)
	}
}

impl From<&str> for MessageId {
	fn from(s: &str) -> Self {
		MessageId::Text(s.to_string())
	}
}

/// Response to a single message request.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
	pub message_id: Option<MessageId>,
	#[serde(default)]
	pub status: Value,
}

/// Per-message entry in a [`BatchResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct BatchItemResponse {
	pub message_id: Option<MessageId>,
	#[serde(default)]
	pub status: Value,
	pub reason: Option<String>,
}

impl BatchItemResponse {
	pub fn is_failure(&self) -> bool {
		self.status.as_str() == Some("failure") || self.message_id.is_none()
	}
}

/// Response to a bulk message request.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
	pub all_succeeded: bool,
	#[serde(default)]
	pub responses: Vec<BatchItemResponse>,
}

/// Outcome of a bulk request as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
	/// Every message was accepted; ids are in request order.
	Accepted(Vec<MessageId>),
	/// The batch failed. Carries the reason of the first failed item.
	Rejected(String),
}

impl BatchResponse {
	/// Collapses the per-item responses into an all-or-nothing outcome.
	///
	/// A batch with `all_succeeded == false` is rejected as a whole even if some
	/// items were accepted, mirroring how the API reports it. An accepted batch
	/// must carry exactly `expected` items, one id per message sent.
	pub fn into_outcome(self, expected: usize) -> BatchOutcome {
		if !self.all_succeeded {
			let reason = self
				.responses
				.into_iter()
				.find(BatchItemResponse::is_failure)
				.and_then(|item| item.reason)
				.unwrap_or_else(|| "batch was not accepted".to_string());
			return BatchOutcome::Rejected(reason);
		}

		if self.responses.len() != expected {
			return BatchOutcome::Rejected(format!(
				"expected {expected} results, got {}",
				self.responses.len()
			));
		}

		let mut ids = Vec::with_capacity(expected);
		for item in self.responses {
			match item.message_id {
				Some(id) => ids.push(id),
				None => {
					return BatchOutcome::Rejected(
						item.reason
							.unwrap_or_else(|| "response item without message_id".to_string()),
					)
				}
			}
		}
		BatchOutcome::Accepted(ids)
	}
}

/// Response to an event insert request.
#[derive(Debug, Clone, Deserialize)]
pub struct EventResponse {
	pub creation_time: Option<String>,
}

/// Body of a 400 response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
	pub reason: Option<String>,
}
