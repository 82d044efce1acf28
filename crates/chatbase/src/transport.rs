// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Network boundary: POST a body to a URL and hand back status and body.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{ChatbaseError, Result};

/// SDK version for identification.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
pub const SDK_NAME: &str = "chatbase-rust";

/// Raw response from a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
	pub status: u16,
	pub body: String,
}

impl TransportResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}
}

/// Sends serialized records to the API.
///
/// Connectivity failures are returned as-is; interpreting status codes is the
/// dispatcher's job.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
	/// POSTs a JSON body to `url`.
	async fn post(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse>;

	/// Releases the underlying connection resources. Must be safe to call twice.
	async fn close(&self) {}
}

/// Returns the User-Agent string sent with every request.
///
/// Format: `chatbase-rust/{version}`
pub fn user_agent() -> String {
	format!("{SDK_NAME}/{SDK_VERSION}")
}

/// [`Transport`] backed by a pooled reqwest client.
pub struct HttpTransport {
	client: RwLock<Option<Client>>,
}

impl HttpTransport {
	/// Creates a transport whose requests time out after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self> {
		let client = Client::builder()
			.user_agent(user_agent())
			.timeout(timeout)
			.build()
			.map_err(ChatbaseError::RequestFailed)?;
		Ok(Self::with_client(client))
	}

	/// Wraps an existing reqwest client, e.g. one with custom TLS settings.
	pub fn with_client(client: Client) -> Self {
		Self {
			client: RwLock::new(Some(client)),
		}
	}

	/// Returns true once [`Transport::close`] has run.
	pub async fn is_closed(&self) -> bool {
		self.client.read().await.is_none()
	}
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
	async fn post(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse> {
		// Clone out of the lock so a slow request never blocks close().
		let client = self
			.client
			.read()
			.await
			.clone()
			.ok_or(ChatbaseError::ClientShutdown)?;

		debug!(url = %url, bytes = body.len(), "Sending request");

		let response = client
			.post(url)
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "text/plain")
			.body(body)
			.send()
			.await?;

		let status = response.status().as_u16();
		let body = response.text().await?;

		debug!(url = %url, status, body = %body, "Received response");

		Ok(TransportResponse { status, body })
	}

	async fn close(&self) {
		if self.client.write().await.take().is_some() {
			info!("HTTP transport closed");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_agent_has_correct_format() {
		let ua = user_agent();
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts, [SDK_NAME, SDK_VERSION]);
	}

	#[tokio::test]
	async fn test_close_is_idempotent() {
		let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
		assert!(!transport.is_closed().await);

		transport.close().await;
		transport.close().await;

		assert!(transport.is_closed().await);
	}

	#[tokio::test]
	async fn test_post_after_close_fails() {
		let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
		transport.close().await;

		let result = transport.post("http://127.0.0.1:9/api/message", Vec::new()).await;
		assert!(matches!(result, Err(ChatbaseError::ClientShutdown)));
	}
}
