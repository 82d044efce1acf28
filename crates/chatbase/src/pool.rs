// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message pooling and background flush.
//!
//! A [`Pool`] buffers messages in memory and a background loop sends them as one
//! bulk request once the queue reaches the configured capacity. Enqueueing never
//! triggers a flush by itself; only the loop (or an explicit [`Pool::flush`] /
//! [`Pool::close`]) does. Flushes are serialized, so batch N finishes before
//! batch N+1 starts.
//!
//! Nothing is persisted: messages still queued when the process exits are lost.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use chatbase_core::{Message, MessageId};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::{OverflowPolicy, PoolConfig};
use crate::error::{ChatbaseError, Result};

/// Handler for sending a pooled batch to the server.
#[async_trait::async_trait]
pub trait BatchSender: Send + Sync {
	/// Sends messages as one request, returning their ids in input order.
	async fn send_batch(&self, messages: Vec<Message>) -> Result<Vec<MessageId>>;
}

/// A message waiting in the pool.
#[derive(Debug, Clone)]
pub struct QueuedMessage {
	/// Position in enqueue order, unique per pool.
	pub sequence: u64,
	pub message: Message,
}

/// Lifecycle of a [`Pool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
	Stopped,
	Running,
	/// `close()` is in progress: the loop is stopping and the final flush is pending.
	Draining,
}

impl PoolState {
	fn from_u8(v: u8) -> Self {
		match v {
			STATE_RUNNING => PoolState::Running,
			STATE_DRAINING => PoolState::Draining,
			_ => PoolState::Stopped,
		}
	}
}

impl fmt::Display for PoolState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			PoolState::Stopped => "stopped",
			PoolState::Running => "running",
			PoolState::Draining => "draining",
		};
		f.write_str(s)
	}
}

const STATE_STOPPED: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_DRAINING: u8 = 2;

struct PoolInner {
	config: PoolConfig,
	sender: Arc<dyn BatchSender>,
	queue: Mutex<Vec<QueuedMessage>>,
	/// Held for the whole of a flush so flushes never overlap.
	flush_lock: Mutex<()>,
	next_sequence: AtomicU64,
	state: AtomicU8,
}

impl PoolInner {
	fn state(&self) -> PoolState {
		PoolState::from_u8(self.state.load(Ordering::SeqCst))
	}

	async fn len(&self) -> usize {
		self.queue.lock().await.len()
	}

	async fn flush(&self) -> Result<Vec<MessageId>> {
		let _guard = self.flush_lock.lock().await;

		// Swap the queue out under the lock: messages enqueued while the request
		// is in flight land in the fresh queue and wait for the next flush.
		let batch = {
			let mut queue = self.queue.lock().await;
			std::mem::take(&mut *queue)
		};

		if batch.is_empty() {
			return Ok(Vec::new());
		}

		let first_sequence = batch[0].sequence;
		debug!(count = batch.len(), first_sequence, "Flushing message pool");

		let messages: Vec<Message> = batch.into_iter().map(|q| q.message).collect();

		// One invalid message fails the whole batch. The batch has already left
		// the queue and is not re-queued, so the valid messages in it are dropped too.
		if let Some(err) = messages.iter().find_map(|m| m.validate().err()) {
			warn!(count = messages.len(), error = %err, "Discarding message batch that failed validation");
			return Err(err.into());
		}

		self.sender.send_batch(messages).await
	}
}

/// In-memory message buffer with a timed flush loop.
///
/// The loop starts when the pool is created and stops on [`Pool::close`], which
/// also sends whatever is still queued.
pub struct Pool {
	inner: Arc<PoolInner>,
	shutdown_tx: Mutex<Option<mpsc::Sender<()>>>,
	task: Mutex<Option<JoinHandle<()>>>,
}

impl Pool {
	/// Creates a pool and starts its background loop on the current tokio runtime.
	pub fn start(config: PoolConfig, sender: Arc<dyn BatchSender>) -> Result<Self> {
		config.validate()?;

		let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
			ChatbaseError::InvalidConfig("message pool requires a tokio runtime".to_string())
		})?;

		let inner = Arc::new(PoolInner {
			config,
			sender,
			queue: Mutex::new(Vec::new()),
			flush_lock: Mutex::new(()),
			next_sequence: AtomicU64::new(0),
			state: AtomicU8::new(STATE_RUNNING),
		});

		let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
		let task = runtime.spawn(run(Arc::clone(&inner), shutdown_rx));

		Ok(Self {
			inner,
			shutdown_tx: Mutex::new(Some(shutdown_tx)),
			task: Mutex::new(Some(task)),
		})
	}

	/// Appends a message to the tail of the queue.
	///
	/// Does not validate the message; validation happens when the batch is
	/// flushed. Fails with [`ChatbaseError::ClientShutdown`] once `close()` has
	/// started, and with [`ChatbaseError::PoolFull`] when a bounded queue is full
	/// under [`OverflowPolicy::RejectNew`].
	pub async fn enqueue(&self, message: Message) -> Result<()> {
		let mut queue = self.inner.queue.lock().await;

		// Checked under the queue lock so close() cannot take its final snapshot
		// between the check and the push.
		if self.inner.state() != PoolState::Running {
			return Err(ChatbaseError::ClientShutdown);
		}

		if let Some(max) = self.inner.config.max_queue_size {
			if queue.len() >= max {
				match self.inner.config.overflow {
					OverflowPolicy::DropOldest => {
						let dropped = queue.remove(0);
						warn!(
							sequence = dropped.sequence,
							user_id = %dropped.message.user_id(),
							"Dropped message due to pool overflow"
						);
					}
					OverflowPolicy::RejectNew => {
						warn!(max_queue_size = max, "Rejected message due to pool overflow");
						return Err(ChatbaseError::PoolFull);
					}
				}
			}
		}

		let sequence = self.inner.next_sequence.fetch_add(1, Ordering::SeqCst);
		queue.push(QueuedMessage { sequence, message });
		Ok(())
	}

	/// Sends everything currently queued as one batch.
	pub async fn flush(&self) -> Result<Vec<MessageId>> {
		self.inner.flush().await
	}

	/// Stops the background loop and flushes what is left.
	///
	/// Idempotent: only the first call does anything. An error from the final
	/// flush is returned to the caller.
	pub async fn close(&self) -> Result<()> {
		if self
			.inner
			.state
			.compare_exchange(
				STATE_RUNNING,
				STATE_DRAINING,
				Ordering::SeqCst,
				Ordering::SeqCst,
			)
			.is_err()
		{
			return Ok(());
		}

		if let Some(tx) = self.shutdown_tx.lock().await.take() {
			if tx.send(()).await.is_err() {
				debug!("Message pool loop already stopped before shutdown signal");
			}
		}

		// Wait for the loop rather than aborting it, so a flush it has already
		// started completes before the final one.
		if let Some(handle) = self.task.lock().await.take() {
			if let Err(e) = handle.await {
				error!(error = %e, "Message pool loop terminated abnormally");
			}
		}

		let remaining = self.inner.len().await;
		let result = self.inner.flush().await;
		self.inner.state.store(STATE_STOPPED, Ordering::SeqCst);

		match &result {
			Ok(_) => info!(flushed = remaining, "Message pool closed"),
			Err(e) => error!(error = %e, flushed = remaining, "Final message pool flush failed"),
		}

		result.map(|_| ())
	}

	/// Returns the number of messages currently queued.
	pub async fn len(&self) -> usize {
		self.inner.len().await
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}

	/// Returns copies of the queued messages in enqueue order.
	pub async fn pending(&self) -> Vec<Message> {
		self.inner
			.queue
			.lock()
			.await
			.iter()
			.map(|q| q.message.clone())
			.collect()
	}

	/// Returns copies of the queue entries, including their sequence numbers.
	pub async fn queued(&self) -> Vec<QueuedMessage> {
		self.inner.queue.lock().await.clone()
	}

	pub fn state(&self) -> PoolState {
		self.inner.state()
	}

	pub fn config(&self) -> &PoolConfig {
		&self.inner.config
	}
}

impl Drop for Pool {
	fn drop(&mut self) {
		if self.inner.state() == PoolState::Running {
			let queued = self.inner.queue.try_lock().map(|q| q.len()).unwrap_or(0);
			if queued > 0 {
				warn!(queued, "Message pool dropped without close; queued messages are lost");
			}
		}
		// Dropping shutdown_tx ends the loop.
	}
}

/// Background loop: every `flush_interval`, flush if the queue is at capacity.
async fn run(inner: Arc<PoolInner>, mut shutdown_rx: mpsc::Receiver<()>) {
	info!(
		capacity = inner.config.capacity,
		flush_interval_ms = inner.config.flush_interval.as_millis() as u64,
		"Starting message pool"
	);

	let mut ticker = tokio::time::interval(inner.config.flush_interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		tokio::select! {
			biased;
			_ = shutdown_rx.recv() => break,
			_ = ticker.tick() => {
				if inner.len().await < inner.config.capacity {
					continue;
				}
				if let Err(e) = inner.flush().await {
					error!(error = %e, "Failed to flush message pool");
				}
			}
		}
	}

	info!("Message pool loop stopped");
}
