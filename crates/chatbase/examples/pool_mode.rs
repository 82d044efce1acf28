// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: buffer messages in a pool and send them in batches.
//!
//! Run with:
//!   CHATBASE_API_KEY=... cargo run --example pool_mode -p chatbase

use std::time::Duration;

use chatbase::{Chatbase, OverflowPolicy};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let api_key =
		std::env::var("CHATBASE_API_KEY").expect("CHATBASE_API_KEY environment variable required");

	let cb = Chatbase::builder()
		.api_key(api_key)
		.platform("Discord")
		.pool_size(5)
		.flush_interval(Duration::from_secs(1))
		.max_queue_size(100, OverflowPolicy::DropOldest)
		.build()?;

	for i in 0..12 {
		let msg = cb
			.prepare_message(format!("user-{}", i % 3))
			.intent("chatter")
			.message(format!("message {i}"))
			.build();
		cb.register_message(msg).await?;
	}

	if let Some(pool) = cb.pool() {
		println!("Queued: {}", pool.len().await);
	}

	// Give the pool a chance to send full batches on its own.
	tokio::time::sleep(Duration::from_secs(3)).await;

	if let Some(pool) = cb.pool() {
		println!("Still queued: {}", pool.len().await);
	}

	// Sends whatever is left.
	cb.close().await?;
	println!("Pool closed.");
	Ok(())
}
