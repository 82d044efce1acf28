// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Custom events with typed properties.

use serde::Serialize;

use crate::user_id::UserId;

/// Value attached to an event property.
///
/// Serializes as a single-key object naming the value kind, e.g.
/// `{"string_value": "two"}`, which is what the events API expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyValue {
	#[serde(rename = "string_value")]
	String(String),
	#[serde(rename = "integer_value")]
	Integer(i64),
	#[serde(rename = "float_value")]
	Float(f64),
	#[serde(rename = "bool_value")]
	Bool(bool),
}

impl From<&str> for PropertyValue {
	fn from(s: &str) -> Self {
		PropertyValue::String(s.to_string())
	}
}

impl From<String> for PropertyValue {
	fn from(s: String) -> Self {
		PropertyValue::String(s)
	}
}

impl From<i64> for PropertyValue {
	fn from(n: i64) -> Self {
		PropertyValue::Integer(n)
	}
}

impl From<i32> for PropertyValue {
	fn from(n: i32) -> Self {
		PropertyValue::Integer(n.into())
	}
}

impl From<f64> for PropertyValue {
	fn from(n: f64) -> Self {
		PropertyValue::Float(n)
	}
}

impl From<bool> for PropertyValue {
	fn from(b: bool) -> Self {
		PropertyValue::Bool(b)
	}
}

/// A named event property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
	pub name: String,
	pub value: PropertyValue,
}

impl Property {
	pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// A custom event, such as a purchase or a sign-up, tied to an intent.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
	user_id: UserId,
	intent: String,
	timestamp_millis: Option<i64>,
	platform: Option<String>,
	version: Option<String>,
	properties: Vec<Property>,
}

impl Event {
	/// Starts building an event. The timestamp defaults to now.
	pub fn builder(user_id: impl Into<UserId>, intent: impl Into<String>) -> EventBuilder {
		EventBuilder {
			event: Event {
				user_id: user_id.into(),
				intent: intent.into(),
				timestamp_millis: Some(crate::now_millis()),
				platform: None,
				version: None,
				properties: Vec::new(),
			},
		}
	}

	pub fn user_id(&self) -> &UserId {
		&self.user_id
	}

	pub fn intent(&self) -> &str {
		&self.intent
	}

	pub fn timestamp_millis(&self) -> Option<i64> {
		self.timestamp_millis
	}

	pub fn platform(&self) -> Option<&str> {
		self.platform.as_deref()
	}

	pub fn version(&self) -> Option<&str> {
		self.version.as_deref()
	}

	pub fn properties(&self) -> &[Property] {
		&self.properties
	}
}

/// Builder for [`Event`].
#[derive(Debug, Clone)]
pub struct EventBuilder {
	event: Event,
}

impl EventBuilder {
	/// Overrides the timestamp. `None` lets the server stamp the event.
	pub fn timestamp_millis(mut self, millis: Option<i64>) -> Self {
		self.event.timestamp_millis = millis;
		self
	}

	pub fn platform(mut self, platform: impl Into<String>) -> Self {
		self.event.platform = Some(platform.into());
		self
	}

	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.event.version = Some(version.into());
		self
	}

	/// Appends a property. Insertion order is kept on the wire.
	pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
		self.event.properties.push(Property::new(name, value));
		self
	}

	pub fn properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
		self.event.properties.extend(properties);
		self
	}

	pub fn build(self) -> Event {
		self.event
	}
}
