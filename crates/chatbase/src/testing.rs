// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory transport used by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::transport::{Transport, TransportResponse};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub url: String,
	pub body: Vec<u8>,
}

impl RecordedRequest {
	pub fn json<T: DeserializeOwned>(&self) -> T {
		serde_json::from_slice(&self.body).expect("request body is not JSON")
	}
}

/// Replays queued responses in order and records every request.
///
/// When the queue runs dry it answers `200 {}`.
#[derive(Default)]
pub struct StubTransport {
	responses: Mutex<VecDeque<TransportResponse>>,
	requests: Mutex<Vec<RecordedRequest>>,
	close_calls: AtomicUsize,
}

impl StubTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_json(&self, status: u16, body: serde_json::Value) {
		self.responses
			.lock()
			.unwrap()
			.push_back(TransportResponse::new(status, body.to_string()));
	}

	pub fn push_raw(&self, status: u16, body: &str) {
		self.responses
			.lock()
			.unwrap()
			.push_back(TransportResponse::new(status, body));
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap().clone()
	}

	pub fn close_calls(&self) -> usize {
		self.close_calls.load(Ordering::SeqCst)
	}
}

#[async_trait::async_trait]
impl Transport for StubTransport {
	async fn post(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse> {
		self.requests.lock().unwrap().push(RecordedRequest {
			url: url.to_string(),
			body,
		});
		let response = self
			.responses
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or_else(|| TransportResponse::new(200, "{}"));
		Ok(response)
	}

	async fn close(&self) {
		self.close_calls.fetch_add(1, Ordering::SeqCst);
	}
}
