// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: register a user message and the bot's reply.
//!
//! Run with:
//!   CHATBASE_API_KEY=... cargo run --example first_integration -p chatbase

use chatbase::Chatbase;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let api_key =
		std::env::var("CHATBASE_API_KEY").expect("CHATBASE_API_KEY environment variable required");

	let cb = Chatbase::new(api_key, "Telegram")?;

	// What the user said
	let user_msg = cb
		.prepare_message("123456")
		.intent("greeting")
		.message("Hello bot!")
		.version("1.0")
		.build();
	let id = cb.register_message(user_msg).await?.resolve().await?;
	println!("User message registered: {:?}", id);

	// What the bot answered
	let bot_msg = cb
		.prepare_message("123456")
		.agent()
		.message("Hi! How can I help?")
		.version("1.0")
		.build();
	let id = cb.register_message(bot_msg).await?.resolve().await?;
	println!("Bot message registered: {:?}", id);

	// A message the bot could not handle
	let unhandled = cb
		.prepare_message("123456")
		.intent("unknown")
		.message("What's the airspeed of an unladen swallow?")
		.not_handled(true)
		.build();
	cb.register_message(unhandled).await?.resolve().await?;

	cb.close().await?;
	Ok(())
}
