// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation errors raised while building or checking records.

use thiserror::Error;

/// A record violates a precondition of the Chatbase API.
///
/// These indicate caller bugs rather than transient conditions and are never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
	/// The message kind is unknown, or a field is set that the kind does not allow.
	#[error("invalid message kind: {0}")]
	InvalidMessageKind(String),

	/// The user identifier is neither a string nor an integer.
	#[error("user id must be string or integer, got {0}")]
	InvalidIdentifierType(String),
}

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;
