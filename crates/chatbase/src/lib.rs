// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Async client for the Chatbase bot analytics API.
//!
//! Register what users say to your bot (and what it answers), link clicks and
//! custom events. Messages can be sent one at a time, in bulk, in the
//! background, or buffered in a [`Pool`] that flushes them in batches.
//!
//! # Example
//!
//! ```ignore
//! use chatbase::{Chatbase, Dispatch, RegisterOptions};
//!
//! let cb = Chatbase::builder()
//!     .api_key("your-api-key")
//!     .platform("Telegram")
//!     .pool_size(5)
//!     .build()?;
//!
//! // Queued; sent once five messages are waiting or on close.
//! let msg = cb.prepare_message("123456").intent("greeting").message("hi").build();
//! cb.register_message(msg).await?;
//!
//! // Sent now, in the background.
//! let click = cb.prepare_click("https://example.com");
//! let handle = cb.register_click_with(click, Dispatch::ForceAsync).await?;
//!
//! cb.close().await?;
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pool;
pub mod task;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{Chatbase, ChatbaseBuilder, Receipt};
pub use codec::JsonCodec;
pub use config::{
	ClientConfig, Dispatch, Endpoints, JsonFormat, OverflowPolicy, PoolConfig, RegisterOptions,
	DEFAULT_FLUSH_INTERVAL, DEFAULT_POOL_CAPACITY,
};
pub use dispatch::Dispatcher;
pub use error::{ChatbaseError, Result};
pub use pool::{BatchSender, Pool, PoolState, QueuedMessage};
pub use task::{Outcome, TaskHandle};
pub use transport::{HttpTransport, Transport, TransportResponse, SDK_NAME, SDK_VERSION};

pub use chatbase_core::{
	Click, Event, EventBuilder, Message, MessageBuilder, MessageId, MessageKind, Property,
	PropertyValue, Record, RecordError, RecordKind, UserId, MAX_MESSAGE_CHARS,
};
