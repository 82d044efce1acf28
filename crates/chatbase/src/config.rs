// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client and pool configuration.

use std::time::Duration;

use crate::error::{ChatbaseError, Result};

/// Default number of queued messages that triggers a pool flush.
pub const DEFAULT_POOL_CAPACITY: usize = 5;
/// Default interval between pool checks.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(2);

/// URLs of the Chatbase REST endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
	pub message: String,
	pub messages: String,
	pub click: String,
	pub event: String,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			message: "https://chatbase.com/api/message".to_string(),
			messages: "https://chatbase.com/api/messages".to_string(),
			click: "https://chatbase.com/api/click".to_string(),
			event: "https://api.chatbase.com/apis/v1/events/insert".to_string(),
		}
	}
}

impl Endpoints {
	/// Builds endpoints rooted at `base_url`, e.g. a proxy or a local mock server.
	pub fn from_base_url(base_url: &str) -> Self {
		let base = base_url.trim_end_matches('/');
		Self {
			message: format!("{base}/api/message"),
			messages: format!("{base}/api/messages"),
			click: format!("{base}/api/click"),
			event: format!("{base}/apis/v1/events/insert"),
		}
	}
}

/// How request bodies are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
	#[default]
	Compact,
	/// Indented output, handy when inspecting traffic.
	Pretty,
}

/// What the pool does with a new message when it is already at `max_queue_size`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
	#[default]
	DropOldest,
	RejectNew,
}

/// Configuration for the message pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
	/// Queue length at which the background loop flushes.
	pub capacity: usize,
	/// Interval between background checks.
	pub flush_interval: Duration,
	/// Upper bound on queued messages. `None` leaves the queue unbounded.
	pub max_queue_size: Option<usize>,
	/// Applied when `max_queue_size` is reached.
	pub overflow: OverflowPolicy,
}

impl Default for PoolConfig {
	fn default() -> Self {
		Self {
			capacity: DEFAULT_POOL_CAPACITY,
			flush_interval: DEFAULT_FLUSH_INTERVAL,
			max_queue_size: None,
			overflow: OverflowPolicy::default(),
		}
	}
}

impl PoolConfig {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			capacity,
			..Self::default()
		}
	}

	pub fn validate(&self) -> Result<()> {
		if self.capacity == 0 {
			return Err(ChatbaseError::InvalidConfig(
				"pool capacity must be greater than 0".to_string(),
			));
		}
		if self.flush_interval.is_zero() {
			return Err(ChatbaseError::InvalidConfig(
				"flush interval must be greater than 0".to_string(),
			));
		}
		if let Some(max) = self.max_queue_size {
			if max < self.capacity {
				return Err(ChatbaseError::InvalidConfig(format!(
					"max queue size ({max}) cannot be below pool capacity ({})",
					self.capacity
				)));
			}
		}
		Ok(())
	}
}

/// Configuration for the Chatbase client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Timeout for HTTP requests.
	pub request_timeout: Duration,
	pub endpoints: Endpoints,
	pub json_format: JsonFormat,
	/// Spawn every registration as a background task unless a call says otherwise.
	pub task_mode: bool,
	/// Message pooling. `None` sends every message immediately.
	pub pool: Option<PoolConfig>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(30),
			endpoints: Endpoints::default(),
			json_format: JsonFormat::default(),
			task_mode: false,
			pool: None,
		}
	}
}

/// Whether a registration runs inline or as a spawned task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
	/// Follow the client's `task_mode`.
	#[default]
	UseClientDefault,
	/// Spawn and hand back a task handle.
	ForceAsync,
	/// Await the result inline.
	ForceSync,
}

impl Dispatch {
	/// Returns true if the call should be spawned.
	pub fn resolve(self, client_default: bool) -> bool {
		match self {
			Dispatch::UseClientDefault => client_default,
			Dispatch::ForceAsync => true,
			Dispatch::ForceSync => false,
		}
	}
}

/// Per-call overrides for a registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
	pub dispatch: Dispatch,
	/// Send immediately even if the client has a message pool.
	pub bypass_pool: bool,
}

impl RegisterOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
		self.dispatch = dispatch;
		self
	}

	/// Shorthand for `dispatch(Dispatch::ForceAsync)`.
	pub fn spawn(self) -> Self {
		self.dispatch(Dispatch::ForceAsync)
	}

	/// Shorthand for `dispatch(Dispatch::ForceSync)`.
	pub fn wait(self) -> Self {
		self.dispatch(Dispatch::ForceSync)
	}

	pub fn bypass_pool(mut self) -> Self {
		self.bypass_pool = true;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_client_config_defaults() {
		let config = ClientConfig::default();
		assert_eq!(config.request_timeout, Duration::from_secs(30));
		assert!(!config.task_mode);
		assert!(config.pool.is_none());
		assert_eq!(config.json_format, JsonFormat::Compact);
	}

	#[test]
	fn test_pool_config_defaults() {
		let config = PoolConfig::default();
		assert_eq!(config.capacity, 5);
		assert_eq!(config.flush_interval, Duration::from_secs(2));
		assert!(config.max_queue_size.is_none());
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_pool_config_rejects_zero_capacity() {
		let config = PoolConfig::with_capacity(0);
		assert!(matches!(
			config.validate(),
			Err(ChatbaseError::InvalidConfig(_))
		));
	}

	#[test]
	fn test_pool_config_rejects_small_queue_bound() {
		let config = PoolConfig {
			max_queue_size: Some(2),
			..PoolConfig::with_capacity(5)
		};
		assert!(matches!(
			config.validate(),
			Err(ChatbaseError::InvalidConfig(_))
		));
	}

	#[test]
	fn test_endpoints_from_base_url() {
		let endpoints = Endpoints::from_base_url("http://127.0.0.1:8080/");
		assert_eq!(endpoints.message, "http://127.0.0.1:8080/api/message");
		assert_eq!(endpoints.messages, "http://127.0.0.1:8080/api/messages");
		assert_eq!(endpoints.click, "http://127.0.0.1:8080/api/click");
		assert_eq!(endpoints.event, "http://127.0.0.1:8080/apis/v1/events/insert");
	}

	#[test]
	fn test_dispatch_resolution_order() {
		assert!(Dispatch::UseClientDefault.resolve(true));
		assert!(!Dispatch::UseClientDefault.resolve(false));
		assert!(Dispatch::ForceAsync.resolve(false));
		assert!(!Dispatch::ForceSync.resolve(true));
	}

	#[test]
	fn test_register_options_builders() {
		let opts = RegisterOptions::new().spawn().bypass_pool();
		assert_eq!(opts.dispatch, Dispatch::ForceAsync);
		assert!(opts.bypass_pool);
		assert_eq!(RegisterOptions::new().wait().dispatch, Dispatch::ForceSync);
	}

	proptest! {
		#[test]
		fn test_queue_bound_at_or_above_capacity_is_valid(
			capacity in 1..100usize,
			extra in 0..1000usize,
		) {
			let config = PoolConfig {
				max_queue_size: Some(capacity + extra),
				..PoolConfig::with_capacity(capacity)
			};
			prop_assert!(config.validate().is_ok());
		}
	}
}
