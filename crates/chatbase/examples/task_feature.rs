// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: register messages in the background.
//!
//! Run with:
//!   CHATBASE_API_KEY=... cargo run --example task_feature -p chatbase

use chatbase::{Chatbase, RegisterOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let api_key =
		std::env::var("CHATBASE_API_KEY").expect("CHATBASE_API_KEY environment variable required");

	// Every registration is spawned unless a call says otherwise.
	let cb = Chatbase::builder()
		.api_key(api_key)
		.platform("Web")
		.task_mode(true)
		.build()?;

	let mut handles = Vec::new();
	for i in 0..5 {
		let msg = cb
			.prepare_message("123456")
			.intent("background")
			.message(format!("message {i}"))
			.build();
		if let Some(handle) = cb.register_message(msg).await?.into_handle() {
			handles.push(handle);
		}
	}
	println!("Spawned {} registrations", handles.len());

	for handle in handles {
		match handle.await {
			Ok(id) => println!("Registered message {}", id),
			Err(e) => println!("Registration failed: {}", e),
		}
	}

	// Opt out of task mode for a single call.
	let msg = cb.prepare_message("123456").intent("inline").build();
	let outcome = cb
		.register_message_with(msg, RegisterOptions::new().wait())
		.await?;
	println!("Inline registration: {:?}", outcome.completed());

	cb.close().await?;
	Ok(())
}
