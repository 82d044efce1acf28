// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: register a custom event and a link click.
//!
//! Run with:
//!   CHATBASE_API_KEY=... cargo run --example event_usage -p chatbase

use chatbase::Chatbase;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let api_key =
		std::env::var("CHATBASE_API_KEY").expect("CHATBASE_API_KEY environment variable required");

	let cb = Chatbase::new(api_key, "Messenger")?;

	let event = cb
		.prepare_event("123456", "purchase")
		.version("2.1")
		.property("item", "coffee")
		.property("quantity", 2)
		.property("price", 3.5)
		.property("gift", false)
		.build();
	let inserted = cb.register_event(event).await?.resolve().await?;
	println!("Event inserted: {:?}", inserted);

	let click = cb
		.prepare_click("https://example.com/menu")
		.with_user_id("123456")
		.with_version("2.1");
	let clicked = cb.register_click(click).await?.resolve().await?;
	println!("Click registered: {:?}", clicked);

	cb.close().await?;
	Ok(())
}
