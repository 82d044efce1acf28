// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Link clicks.

use crate::user_id::UserId;

/// A click on a link the bot sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
	url: String,
	platform: String,
	user_id: Option<UserId>,
	version: Option<String>,
}

impl Click {
	/// Creates a click on `url` (the full URL being redirected to).
	pub fn new(url: impl Into<String>, platform: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			platform: platform.into(),
			user_id: None,
			version: None,
		}
	}

	/// Sets the user who clicked the link.
	pub fn with_user_id(mut self, user_id: impl Into<UserId>) -> Self {
		self.user_id = Some(user_id.into());
		self
	}

	/// Sets the version of the bot that sent the link.
	pub fn with_version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());
		self
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn platform(&self) -> &str {
		&self.platform
	}

	pub fn user_id(&self) -> Option<&UserId> {
		self.user_id.as_ref()
	}

	pub fn version(&self) -> Option<&str> {
		self.version.as_deref()
	}
}
