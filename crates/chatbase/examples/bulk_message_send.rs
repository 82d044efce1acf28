// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: register several messages in a single request.
//!
//! Run with:
//!   CHATBASE_API_KEY=... cargo run --example bulk_message_send -p chatbase

use chatbase::{Chatbase, ChatbaseError, Dispatch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let api_key =
		std::env::var("CHATBASE_API_KEY").expect("CHATBASE_API_KEY environment variable required");

	let cb = Chatbase::new(api_key, "Slack")?;

	let messages = (1..=3)
		.map(|i| {
			cb.prepare_message(format!("user-{i}"))
				.intent("bulk")
				.message(format!("message number {i}"))
				.session_id("bulk-session")
				.build()
		})
		.collect();

	match cb.register_messages(messages, Dispatch::default()).await?.resolve().await {
		Ok(Some(ids)) => {
			for id in ids {
				println!("Registered message {}", id);
			}
		}
		Ok(None) => {}
		Err(ChatbaseError::RemoteRejected { reason }) => {
			println!("Batch rejected: {}", reason);
		}
		Err(e) => return Err(e.into()),
	}

	cb.close().await?;
	Ok(())
}
