// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Chatbase client: builds records, then sends or pools them.

use std::convert::identity;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chatbase_core::{
	Click, Event, EventBuilder, Message, MessageBuilder, MessageId, Record, UserId,
};
use tracing::{debug, error, info};

use crate::codec::JsonCodec;
use crate::config::{
	ClientConfig, Dispatch, Endpoints, JsonFormat, OverflowPolicy, PoolConfig, RegisterOptions,
};
use crate::dispatch::Dispatcher;
use crate::error::{ChatbaseError, Result};
use crate::pool::{BatchSender, Pool};
use crate::task::{Outcome, TaskHandle};
use crate::transport::{HttpTransport, Transport};

/// Builder for constructing a [`Chatbase`] client.
pub struct ChatbaseBuilder {
	api_key: Option<String>,
	platform: Option<String>,
	pool_size: usize,
	pool_config: PoolConfig,
	config: ClientConfig,
	transport: Option<Arc<dyn Transport>>,
}

impl ChatbaseBuilder {
	/// Creates a new builder with default settings and pooling disabled.
	pub fn new() -> Self {
		Self {
			api_key: None,
			platform: None,
			pool_size: 0,
			pool_config: PoolConfig::default(),
			config: ClientConfig::default(),
			transport: None,
		}
	}

	/// Sets the bot's API key.
	pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = Some(api_key.into());
		self
	}

	/// Sets the platform messages and clicks are attributed to.
	///
	/// Example: `Telegram`, `Slack`, `Web`, or a custom name.
	pub fn platform(mut self, platform: impl Into<String>) -> Self {
		self.platform = Some(platform.into());
		self
	}

	/// Enables message pooling with the given flush threshold. `0` disables it.
	pub fn pool_size(mut self, size: usize) -> Self {
		self.pool_size = size;
		self
	}

	/// Enables message pooling with a full pool configuration.
	pub fn pool(mut self, config: PoolConfig) -> Self {
		self.pool_size = config.capacity;
		self.pool_config = config;
		self
	}

	/// Sets how often the pool checks whether to flush.
	pub fn flush_interval(mut self, interval: Duration) -> Self {
		self.pool_config.flush_interval = interval;
		self
	}

	/// Bounds the pool's queue.
	pub fn max_queue_size(mut self, max: usize, overflow: OverflowPolicy) -> Self {
		self.pool_config.max_queue_size = Some(max);
		self.pool_config.overflow = overflow;
		self
	}

	/// Spawns every registration in the background unless a call overrides it.
	pub fn task_mode(mut self, enabled: bool) -> Self {
		self.config.task_mode = enabled;
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
		self.config.endpoints = endpoints;
		self
	}

	/// Points every endpoint at `base_url`, e.g. a proxy.
	pub fn base_url(self, base_url: &str) -> Self {
		self.endpoints(Endpoints::from_base_url(base_url))
	}

	pub fn json_format(mut self, format: JsonFormat) -> Self {
		self.config.json_format = format;
		self
	}

	/// Replaces the HTTP transport. `request_timeout` is ignored when set.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Builds the client.
	///
	/// With pooling enabled this starts the pool's background loop and must be
	/// called from within a tokio runtime.
	pub fn build(self) -> Result<Chatbase> {
		let api_key = self
			.api_key
			.filter(|k| !k.is_empty())
			.ok_or(ChatbaseError::MissingApiKey)?;
		let platform = self
			.platform
			.filter(|p| !p.is_empty())
			.ok_or(ChatbaseError::MissingPlatform)?;

		let mut config = self.config;
		config.pool = (self.pool_size > 0).then(|| PoolConfig {
			capacity: self.pool_size,
			..self.pool_config
		});

		let transport = match self.transport {
			Some(transport) => transport,
			None => Arc::new(HttpTransport::new(config.request_timeout)?),
		};

		let dispatcher = Arc::new(Dispatcher::new(
			api_key,
			config.endpoints.clone(),
			JsonCodec::new(config.json_format),
			transport,
		));

		let pool = match &config.pool {
			Some(pool_config) => {
				let sender: Arc<dyn BatchSender> = dispatcher.clone();
				Some(Pool::start(pool_config.clone(), sender)?)
			}
			None => None,
		};

		info!(
			platform = %platform,
			pooled = pool.is_some(),
			task_mode = config.task_mode,
			"Chatbase client initialized"
		);

		Ok(Chatbase {
			inner: Arc::new(ChatbaseInner {
				platform,
				config,
				dispatcher,
				pool,
				closed: AtomicBool::new(false),
			}),
		})
	}
}

impl Default for ChatbaseBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ChatbaseInner {
	platform: String,
	config: ClientConfig,
	dispatcher: Arc<Dispatcher>,
	pool: Option<Pool>,
	closed: AtomicBool,
}

/// The API's answer to a generic [`Chatbase::register`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
	Message(MessageId),
	Click(bool),
	Event(bool),
}

/// Client for registering messages, clicks and events with Chatbase.
///
/// # Example
///
/// ```ignore
/// use chatbase::Chatbase;
///
/// let cb = Chatbase::builder()
///     .api_key("your-api-key")
///     .platform("Telegram")
///     .build()?;
///
/// let msg = cb.prepare_message("123456").intent("greeting").build();
/// let id = cb.register_message(msg).await?.resolve().await?;
///
/// cb.close().await?;
/// ```
#[derive(Clone)]
pub struct Chatbase {
	inner: Arc<ChatbaseInner>,
}

impl Chatbase {
	/// Creates a new builder for constructing a client.
	pub fn builder() -> ChatbaseBuilder {
		ChatbaseBuilder::new()
	}

	/// Creates a client with default settings.
	pub fn new(api_key: impl Into<String>, platform: impl Into<String>) -> Result<Self> {
		Self::builder().api_key(api_key).platform(platform).build()
	}

	pub fn platform(&self) -> &str {
		&self.inner.platform
	}

	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	/// Returns the message pool, if pooling is enabled.
	pub fn pool(&self) -> Option<&Pool> {
		self.inner.pool.as_ref()
	}

	/// Starts a user message on this client's platform.
	pub fn prepare_message(&self, user_id: impl Into<UserId>) -> MessageBuilder {
		Message::builder(user_id, self.inner.platform.clone())
	}

	/// Creates a click on this client's platform.
	pub fn prepare_click(&self, url: impl Into<String>) -> Click {
		Click::new(url, self.inner.platform.clone())
	}

	/// Starts an event on this client's platform.
	pub fn prepare_event(&self, user_id: impl Into<UserId>, intent: impl Into<String>) -> EventBuilder {
		Event::builder(user_id, intent).platform(self.inner.platform.clone())
	}

	/// Registers a message using the client's defaults.
	pub async fn register_message(&self, message: Message) -> Result<Outcome<MessageId>> {
		self.register_message_with(message, RegisterOptions::default())
			.await
	}

	/// Registers a message.
	///
	/// With pooling enabled (and not bypassed) the message is queued and
	/// `Outcome::Pooled` is returned; validation then happens at flush time.
	/// Otherwise the message is validated and sent.
	pub async fn register_message_with(
		&self,
		message: Message,
		options: RegisterOptions,
	) -> Result<Outcome<MessageId>> {
		self.submit_message(message, options, identity).await
	}

	/// Registers several messages in one request, bypassing the pool.
	///
	/// Every message is validated first; one invalid message fails the call
	/// before anything is sent.
	pub async fn register_messages(
		&self,
		messages: Vec<Message>,
		dispatch: Dispatch,
	) -> Result<Outcome<Vec<MessageId>>> {
		self.check_closed()?;

		for message in &messages {
			message.validate()?;
		}

		self.dispatch(dispatch, move |d| async move {
			d.send_messages(&messages).await
		})
		.await
	}

	/// Registers a link click using the client's defaults.
	pub async fn register_click(&self, click: Click) -> Result<Outcome<bool>> {
		self.register_click_with(click, Dispatch::default()).await
	}

	/// Registers a link click. Clicks are never pooled.
	pub async fn register_click_with(&self, click: Click, dispatch: Dispatch) -> Result<Outcome<bool>> {
		self.submit_click(click, dispatch, identity).await
	}

	/// Registers an event using the client's defaults.
	pub async fn register_event(&self, event: Event) -> Result<Outcome<bool>> {
		self.register_event_with(event, Dispatch::default()).await
	}

	/// Registers an event. Events are never pooled.
	pub async fn register_event_with(&self, event: Event, dispatch: Dispatch) -> Result<Outcome<bool>> {
		self.submit_event(event, dispatch, identity).await
	}

	/// Registers any record, routing it like the typed methods do.
	///
	/// A spawned registration hands back the handle of the task doing the send,
	/// so aborting it cancels the request itself.
	pub async fn register(&self, record: Record, options: RegisterOptions) -> Result<Outcome<Receipt>> {
		match record {
			Record::Message(message) => {
				self.submit_message(message, options, Receipt::Message)
					.await
			}
			Record::Click(click) => {
				self.submit_click(click, options.dispatch, Receipt::Click)
					.await
			}
			Record::Event(event) => {
				self.submit_event(event, options.dispatch, Receipt::Event)
					.await
			}
		}
	}

	/// Flushes the pool now. Returns no ids when pooling is disabled.
	pub async fn flush(&self) -> Result<Vec<MessageId>> {
		match &self.inner.pool {
			Some(pool) => pool.flush().await,
			None => Ok(Vec::new()),
		}
	}

	/// Closes the pool (sending any queued messages) and releases the transport.
	///
	/// Idempotent. The transport is released even if the final flush fails; the
	/// flush error is still returned.
	pub async fn close(&self) -> Result<()> {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}

		let pool_result = match &self.inner.pool {
			Some(pool) => pool.close().await,
			None => Ok(()),
		};
		if let Err(e) = &pool_result {
			error!(error = %e, "Failed to flush message pool during close");
		}

		self.inner.dispatcher.close().await;

		info!("Chatbase client closed");
		pool_result
	}

	/// Returns true if the client has been closed.
	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	fn check_closed(&self) -> Result<()> {
		if self.inner.closed.load(Ordering::SeqCst) {
			return Err(ChatbaseError::ClientShutdown);
		}
		Ok(())
	}

	async fn submit_message<T, W>(
		&self,
		message: Message,
		options: RegisterOptions,
		wrap: W,
	) -> Result<Outcome<T>>
	where
		T: Send + 'static,
		W: FnOnce(MessageId) -> T + Send + 'static,
	{
		self.check_closed()?;

		if !options.bypass_pool {
			if let Some(pool) = &self.inner.pool {
				debug!(user_id = %message.user_id(), "Queueing message in pool");
				pool.enqueue(message).await?;
				return Ok(Outcome::Pooled);
			}
		}

		message.validate()?;
		self.dispatch(options.dispatch, move |d| async move {
			d.send_message(&message).await.map(wrap)
		})
		.await
	}

	async fn submit_click<T, W>(&self, click: Click, dispatch: Dispatch, wrap: W) -> Result<Outcome<T>>
	where
		T: Send + 'static,
		W: FnOnce(bool) -> T + Send + 'static,
	{
		self.check_closed()?;
		self.dispatch(dispatch, move |d| async move {
			d.send_click(&click).await.map(wrap)
		})
		.await
	}

	async fn submit_event<T, W>(&self, event: Event, dispatch: Dispatch, wrap: W) -> Result<Outcome<T>>
	where
		T: Send + 'static,
		W: FnOnce(bool) -> T + Send + 'static,
	{
		self.check_closed()?;
		self.dispatch(dispatch, move |d| async move {
			d.send_event(&event).await.map(wrap)
		})
		.await
	}

	/// Runs `op` inline or as a spawned task.
	///
	/// Resolution order: the per-call `dispatch`, then the client's `task_mode`.
	async fn dispatch<T, F, Fut>(&self, dispatch: Dispatch, op: F) -> Result<Outcome<T>>
	where
		T: Send + 'static,
		F: FnOnce(Arc<Dispatcher>) -> Fut,
		Fut: Future<Output = Result<T>> + Send + 'static,
	{
		let future = op(Arc::clone(&self.inner.dispatcher));
		if dispatch.resolve(self.inner.config.task_mode) {
			Ok(Outcome::Spawned(TaskHandle::spawn(future)))
		} else {
			future.await.map(Outcome::Completed)
		}
	}
}
