// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-user identifiers.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::RecordError;

/// Identifier of the end user a record is about.
///
/// The API accepts strings and integers. Both are sent as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserId {
	Text(String),
	Integer(i64),
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UserId::Text(s) => f.write_str(s),
			UserId::Integer(n) => write!(f, "{n}"),
		}
	}
}

impl Serialize for UserId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl From<&str> for UserId {
	fn from(s: &str) -> Self {
		UserId::Text(s.to_string())
	}
}

impl From<String> for UserId {
	fn from(s: String) -> Self {
		UserId::Text(s)
	}
}

impl From<i64> for UserId {
	fn from(n: i64) -> Self {
		UserId::Integer(n)
	}
}

impl From<i32> for UserId {
	fn from(n: i32) -> Self {
		UserId::Integer(n.into())
	}
}

impl From<u32> for UserId {
	fn from(n: u32) -> Self {
		UserId::Integer(n.into())
	}
}

/// Accepts untyped input, e.g. ids lifted out of a webhook payload.
impl TryFrom<Value> for UserId {
	type Error = RecordError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::String(s) => Ok(UserId::Text(s)),
			Value::Number(ref n) => n
				.as_i64()
				.map(UserId::Integer)
				.ok_or_else(|| RecordError::InvalidIdentifierType(format!("number {n}"))),
			Value::Null => Err(RecordError::InvalidIdentifierType("null".to_string())),
			Value::Bool(_) => Err(RecordError::InvalidIdentifierType("bool".to_string())),
			Value::Array(_) => Err(RecordError::InvalidIdentifierType("array".to_string())),
			Value::Object(_) => Err(RecordError::InvalidIdentifierType("object".to_string())),
		}
	}
}
