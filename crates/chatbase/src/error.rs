// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Chatbase SDK.

use chatbase_core::RecordError;
use thiserror::Error;

/// Chatbase SDK errors.
#[derive(Debug, Error)]
pub enum ChatbaseError {
	/// A record failed validation before anything was sent.
	#[error(transparent)]
	Validation(#[from] RecordError),

	/// The API did not recognise the API key.
	#[error("invalid API key")]
	InvalidCredential,

	/// The API rejected the request.
	#[error("request rejected: {reason}")]
	RemoteRejected { reason: String },

	/// The API answered with a status the client does not know how to handle.
	#[error("unknown response (status {status})")]
	RemoteUnknown { status: u16 },

	/// A successful response lacked the field the client needed.
	#[error("malformed response: {0}")]
	MalformedResponse(String),

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Serialization error.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),

	/// Client has been closed.
	#[error("client has been shut down")]
	ClientShutdown,

	/// No API key was configured.
	#[error("API key is required")]
	MissingApiKey,

	/// No platform was configured.
	#[error("platform is required")]
	MissingPlatform,

	/// Configuration is inconsistent.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// The message pool is at its size limit and rejects new messages.
	#[error("message pool is full")]
	PoolFull,

	/// A fire-and-forget task was aborted before it finished.
	#[error("background task was cancelled")]
	TaskCancelled,

	/// A fire-and-forget task panicked.
	#[error("background task panicked: {0}")]
	TaskPanicked(String),
}

impl ChatbaseError {
	/// Returns true for errors caused by invalid caller-supplied data.
	pub fn is_validation(&self) -> bool {
		matches!(self, ChatbaseError::Validation(_))
	}
}

/// Result type alias for Chatbase operations.
pub type Result<T> = std::result::Result<T, ChatbaseError>;
