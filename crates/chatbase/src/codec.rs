// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON encoding of request bodies and decoding of responses.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::JsonFormat;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
	format: JsonFormat,
}

impl JsonCodec {
	pub fn new(format: JsonFormat) -> Self {
		Self { format }
	}

	pub fn format(&self) -> JsonFormat {
		self.format
	}

	pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
		let bytes = match self.format {
			JsonFormat::Compact => serde_json::to_vec(value)?,
			JsonFormat::Pretty => serde_json::to_vec_pretty(value)?,
		};
		Ok(bytes)
	}

	pub fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
		Ok(serde_json::from_str(body)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ChatbaseError;
	use serde_json::{json, Value};

	#[test]
	fn test_compact_encoding() {
		let codec = JsonCodec::default();
		assert_eq!(codec.encode(&json!({})).unwrap(), b"{}");
		assert_eq!(codec.encode(&json!({"a": 1})).unwrap(), br#"{"a":1}"#);
	}

	#[test]
	fn test_pretty_encoding_decodes_to_same_value() {
		let codec = JsonCodec::new(JsonFormat::Pretty);
		let value = json!({"a": 1, "b": [true, null]});
		let bytes = codec.encode(&value).unwrap();

		assert!(bytes.contains(&b'\n'));
		let text = String::from_utf8(bytes).unwrap();
		assert_eq!(codec.decode::<Value>(&text).unwrap(), value);
	}

	#[test]
	fn test_decode_error_is_serialization_error() {
		let codec = JsonCodec::default();
		let result = codec.decode::<Value>("not json");
		assert!(matches!(result, Err(ChatbaseError::SerializationError(_))));
	}
}
