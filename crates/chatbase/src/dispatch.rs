// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Serializes records, sends them through the transport and turns the API's
//! answers into typed results.

use std::sync::Arc;

use chatbase_core::{
	BatchOutcome, BatchPayload, BatchResponse, Click, ClickPayload, ErrorResponse, Event,
	EventPayload, EventResponse, Message, MessageId, MessagePayload, MessageResponse,
	INVALID_API_KEY_REASON,
};
use tracing::{debug, warn};

use crate::codec::JsonCodec;
use crate::config::Endpoints;
use crate::error::{ChatbaseError, Result};
use crate::pool::BatchSender;
use crate::transport::{Transport, TransportResponse};

/// Sends records to the API on behalf of a client.
///
/// The dispatcher does not validate records; callers check them first so that
/// invalid data never reaches the network.
pub struct Dispatcher {
	api_key: String,
	endpoints: Endpoints,
	codec: JsonCodec,
	transport: Arc<dyn Transport>,
}

impl Dispatcher {
	pub fn new(
		api_key: impl Into<String>,
		endpoints: Endpoints,
		codec: JsonCodec,
		transport: Arc<dyn Transport>,
	) -> Self {
		Self {
			api_key: api_key.into(),
			endpoints,
			codec,
			transport,
		}
	}

	/// Registers one message and returns the id the API assigned to it.
	pub async fn send_message(&self, message: &Message) -> Result<MessageId> {
		let body = self
			.codec
			.encode(&MessagePayload::new(&self.api_key, message))?;
		let text = self.post(&self.endpoints.message, body).await?;

		let response: MessageResponse = self.codec.decode(&text)?;
		response
			.message_id
			.ok_or_else(|| ChatbaseError::MalformedResponse("missing message_id".to_string()))
	}

	/// Registers messages in one request. Ids come back in input order.
	pub async fn send_messages(&self, messages: &[Message]) -> Result<Vec<MessageId>> {
		if messages.is_empty() {
			return Ok(Vec::new());
		}

		let body = self
			.codec
			.encode(&BatchPayload::new(&self.api_key, messages))?;
		let text = self.post(&self.endpoints.messages, body).await?;

		let response: BatchResponse = self.codec.decode(&text)?;
		match response.into_outcome(messages.len()) {
			BatchOutcome::Accepted(ids) => {
				debug!(count = ids.len(), "Message batch accepted");
				Ok(ids)
			}
			BatchOutcome::Rejected(reason) => {
				warn!(count = messages.len(), reason = %reason, "Message batch rejected");
				Err(ChatbaseError::RemoteRejected { reason })
			}
		}
	}

	/// Registers a link click. The API answers with no success field, so any
	/// 200 with a JSON body counts as accepted.
	pub async fn send_click(&self, click: &Click) -> Result<bool> {
		let body = self.codec.encode(&ClickPayload::new(&self.api_key, click))?;
		let text = self.post(&self.endpoints.click, body).await?;

		let _: serde_json::Value = self.codec.decode(&text)?;
		Ok(true)
	}

	/// Registers an event. Returns whether the API recorded a creation time.
	pub async fn send_event(&self, event: &Event) -> Result<bool> {
		let body = self.codec.encode(&EventPayload::new(&self.api_key, event))?;
		let text = self.post(&self.endpoints.event, body).await?;

		let response: EventResponse = self.codec.decode(&text)?;
		Ok(response.creation_time.is_some())
	}

	/// Releases the transport.
	pub async fn close(&self) {
		self.transport.close().await;
	}

	async fn post(&self, url: &str, body: Vec<u8>) -> Result<String> {
		let response = self.transport.post(url, body).await?;
		interpret(&self.codec, response)
	}
}

#[async_trait::async_trait]
impl BatchSender for Dispatcher {
	async fn send_batch(&self, messages: Vec<Message>) -> Result<Vec<MessageId>> {
		self.send_messages(&messages).await
	}
}

/// Maps a raw response to its body or to a classified error.
fn interpret(codec: &JsonCodec, response: TransportResponse) -> Result<String> {
	match response.status {
		200 => Ok(response.body),
		400 => {
			let reason = codec
				.decode::<ErrorResponse>(&response.body)
				.unwrap_or_default()
				.reason
				.unwrap_or_default();

			if reason == INVALID_API_KEY_REASON {
				warn!("Chatbase rejected the API key");
				return Err(ChatbaseError::InvalidCredential);
			}

			warn!(reason = %reason, "Chatbase rejected the request");
			Err(ChatbaseError::RemoteRejected { reason })
		}
		status => {
			warn!(status, "Unexpected response from Chatbase");
			Err(ChatbaseError::RemoteUnknown { status })
		}
	}
}
