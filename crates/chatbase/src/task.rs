// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fire-and-forget registrations.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::error::{ChatbaseError, Result};

/// Handle to a registration running in the background.
///
/// Await it (or call [`TaskHandle::join`]) to get the result. If the handle is
/// dropped the request still completes, but its outcome, including any error,
/// is never observed.
#[derive(Debug)]
pub struct TaskHandle<T> {
	handle: JoinHandle<Result<T>>,
}

impl<T: Send + 'static> TaskHandle<T> {
	pub(crate) fn spawn<F>(future: F) -> Self
	where
		F: Future<Output = Result<T>> + Send + 'static,
	{
		let handle = tokio::spawn(async move {
			let result = future.await;
			if let Err(e) = &result {
				debug!(error = %e, "Background registration failed");
			}
			result
		});
		Self { handle }
	}
}

impl<T> TaskHandle<T> {
	/// Waits for the registration to finish.
	pub async fn join(self) -> Result<T> {
		self.await
	}

	/// Cancels the task. A request already on the wire may still be processed
	/// by the server.
	pub fn abort(&self) {
		self.handle.abort();
	}

	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}
}

impl<T> Future for TaskHandle<T> {
	type Output = Result<T>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
			Ok(result) => result,
			Err(e) => Err(join_error(e)),
		})
	}
}

fn join_error(e: JoinError) -> ChatbaseError {
	if e.is_cancelled() {
		ChatbaseError::TaskCancelled
	} else {
		ChatbaseError::TaskPanicked(e.to_string())
	}
}

/// What a registration produced.
#[derive(Debug)]
pub enum Outcome<T> {
	/// Sent inline; the API's answer.
	Completed(T),
	/// Sent in the background.
	Spawned(TaskHandle<T>),
	/// Queued in the message pool. The result surfaces only in the pool's flush.
	Pooled,
}

impl<T> Outcome<T> {
	/// Waits for a spawned task if there is one. `Pooled` resolves to `None`.
	pub async fn resolve(self) -> Result<Option<T>> {
		match self {
			Outcome::Completed(value) => Ok(Some(value)),
			Outcome::Spawned(handle) => handle.await.map(Some),
			Outcome::Pooled => Ok(None),
		}
	}

	/// Returns the value if the registration completed inline.
	pub fn completed(self) -> Option<T> {
		match self {
			Outcome::Completed(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the task handle if the registration was spawned.
	pub fn into_handle(self) -> Option<TaskHandle<T>> {
		match self {
			Outcome::Spawned(handle) => Some(handle),
			_ => None,
		}
	}

	pub fn is_pooled(&self) -> bool {
		matches!(self, Outcome::Pooled)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[tokio::test]
	async fn test_handle_returns_result() {
		let handle = TaskHandle::spawn(async { Ok::<_, ChatbaseError>(42) });
		assert_eq!(handle.join().await.unwrap(), 42);
	}

	#[tokio::test]
	async fn test_handle_returns_error() {
		let handle: TaskHandle<()> =
			TaskHandle::spawn(async { Err(ChatbaseError::RemoteUnknown { status: 502 }) });
		assert!(matches!(
			handle.await,
			Err(ChatbaseError::RemoteUnknown { status: 502 })
		));
	}

	#[tokio::test]
	async fn test_aborted_handle_reports_cancelled() {
		let handle = TaskHandle::spawn(async {
			tokio::time::sleep(Duration::from_secs(60)).await;
			Ok(())
		});
		handle.abort();
		assert!(matches!(handle.await, Err(ChatbaseError::TaskCancelled)));
	}

	#[tokio::test]
	async fn test_outcome_resolve() {
		assert_eq!(Outcome::Completed(1).resolve().await.unwrap(), Some(1));
		assert_eq!(Outcome::<i32>::Pooled.resolve().await.unwrap(), None);

		let spawned = Outcome::Spawned(TaskHandle::spawn(async { Ok(7) }));
		assert_eq!(spawned.resolve().await.unwrap(), Some(7));
	}
}
