// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire payloads for the Chatbase REST endpoints.
//!
//! Payloads borrow from records and add the bot's API key, so the same record
//! can be sent by clients configured with different keys.

use serde::Serialize;

use crate::click::Click;
use crate::event::{Event, Property, PropertyValue};
use crate::message::{Message, MessageKind};
use crate::user_id::UserId;

/// Body of a single-message request. Also the element type of [`BatchPayload`].
#[derive(Debug, Serialize)]
pub struct MessagePayload<'a> {
	pub api_key: &'a str,
	#[serde(rename = "type")]
	pub kind: MessageKind,
	pub user_id: &'a UserId,
	pub time_stamp: i64,
	pub platform: &'a str,
	pub message: &'a str,
	pub intent: &'a str,
	pub not_handled: bool,
	pub version: &'a str,
	pub session_id: &'a str,
}

impl<'a> MessagePayload<'a> {
	pub fn new(api_key: &'a str, message: &'a Message) -> Self {
		Self {
			api_key,
			kind: message.kind(),
			user_id: message.user_id(),
			time_stamp: message.time_stamp(),
			platform: message.platform(),
			message: message.message().unwrap_or_default(),
			intent: message.intent().unwrap_or_default(),
			not_handled: message.not_handled(),
			version: message.version().unwrap_or_default(),
			session_id: message.session_id().unwrap_or_default(),
		}
	}
}

/// Body of a bulk message request. Order of `messages` is the order of the ids
/// in the response.
#[derive(Debug, Serialize)]
pub struct BatchPayload<'a> {
	pub messages: Vec<MessagePayload<'a>>,
}

impl<'a> BatchPayload<'a> {
	pub fn new<I>(api_key: &'a str, messages: I) -> Self
	where
		I: IntoIterator<Item = &'a Message>,
	{
		Self {
			messages: messages
				.into_iter()
				.map(|m| MessagePayload::new(api_key, m))
				.collect(),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct ClickPayload<'a> {
	pub api_key: &'a str,
	pub url: &'a str,
	pub platform: &'a str,
	pub user_id: String,
	pub version: &'a str,
}

impl<'a> ClickPayload<'a> {
	pub fn new(api_key: &'a str, click: &'a Click) -> Self {
		Self {
			api_key,
			url: click.url(),
			platform: click.platform(),
			user_id: click.user_id().map(|u| u.to_string()).unwrap_or_default(),
			version: click.version().unwrap_or_default(),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct PropertyPayload<'a> {
	pub property_name: &'a str,
	#[serde(flatten)]
	pub value: &'a PropertyValue,
}

impl<'a> From<&'a Property> for PropertyPayload<'a> {
	fn from(p: &'a Property) -> Self {
		Self {
			property_name: &p.name,
			value: &p.value,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct EventPayload<'a> {
	pub api_key: &'a str,
	pub user_id: &'a UserId,
	pub intent: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timestamp_millis: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub platform: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<&'a str>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub properties: Vec<PropertyPayload<'a>>,
}

impl<'a> EventPayload<'a> {
	pub fn new(api_key: &'a str, event: &'a Event) -> Self {
		Self {
			api_key,
			user_id: event.user_id(),
			intent: event.intent(),
			timestamp_millis: event.timestamp_millis(),
			platform: event.platform(),
			version: event.version(),
			properties: event.properties().iter().map(PropertyPayload::from).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	const API_KEY: &str = "123456789:AABBCCDDEEFFaabbccddeeff-1234567890";

	#[test]
	fn test_message_payload_fills_defaults() {
		let msg = Message::builder("123456", "TestPlatform")
			.intent("Another message")
			.time_stamp(1_533_165_000_000)
			.build();

		let value = serde_json::to_value(MessagePayload::new(API_KEY, &msg)).unwrap();
		assert_eq!(
			value,
			json!({
				"api_key": API_KEY,
				"type": "user",
				"user_id": "123456",
				"time_stamp": 1_533_165_000_000_i64,
				"platform": "TestPlatform",
				"message": "",
				"intent": "Another message",
				"not_handled": false,
				"version": "",
				"session_id": "",
			})
		);
	}

	#[test]
	fn test_batch_payload_preserves_order() {
		let msgs: Vec<Message> = ["1", "2", "3"]
			.iter()
			.map(|id| Message::builder(*id, "Web").build())
			.collect();

		let value = serde_json::to_value(BatchPayload::new(API_KEY, &msgs)).unwrap();
		let ids: Vec<&str> = value["messages"]
			.as_array()
			.unwrap()
			.iter()
			.map(|m| m["user_id"].as_str().unwrap())
			.collect();
		assert_eq!(ids, ["1", "2", "3"]);
	}

	#[test]
	fn test_click_payload() {
		let click = Click::new("google.com", "Web").with_user_id(42);
		let value = serde_json::to_value(ClickPayload::new(API_KEY, &click)).unwrap();
		assert_eq!(
			value,
			json!({
				"api_key": API_KEY,
				"url": "google.com",
				"platform": "Web",
				"user_id": "42",
				"version": "",
			})
		);
	}

	#[test]
	fn test_event_payload_properties() {
		let event = Event::builder("123456", "test event")
			.timestamp_millis(None)
			.property("count", 1)
			.property("name", "two")
			.property("ratio", 3.0)
			.property("premium", true)
			.build();

		let value = serde_json::to_value(EventPayload::new(API_KEY, &event)).unwrap();
		assert_eq!(
			value,
			json!({
				"api_key": API_KEY,
				"user_id": "123456",
				"intent": "test event",
				"properties": [
					{"property_name": "count", "integer_value": 1},
					{"property_name": "name", "string_value": "two"},
					{"property_name": "ratio", "float_value": 3.0},
					{"property_name": "premium", "bool_value": true},
				],
			})
		);
	}

	#[test]
	fn test_event_payload_omits_empty_optionals() {
		let event = Event::builder(1, "signup").timestamp_millis(None).build();
		let value = serde_json::to_value(EventPayload::new(API_KEY, &event)).unwrap();
		let obj = value.as_object().unwrap();
		assert!(!obj.contains_key("platform"));
		assert!(!obj.contains_key("version"));
		assert!(!obj.contains_key("properties"));
		assert!(!obj.contains_key("timestamp_millis"));
	}
}
