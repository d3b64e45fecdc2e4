use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Caller-supplied deadline and cancellation signal for one gateway call.
///
/// The default context never expires and cannot be cancelled.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
	deadline:  Option<Instant>,
	cancelled: Option<watch::Receiver<bool>>,
}

/// Cancels every [`CallContext`] derived from the same
/// [`CallContext::cancellable`] call.
#[derive(Debug)]
pub struct CancelHandle {
	sender: watch::Sender<bool>,
}

impl CancelHandle {
	pub fn cancel(&self) {
		self.sender.send_replace(true);
	}
}

impl CallContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancellable() -> (Self, CancelHandle) {
		let (sender, receiver) = watch::channel(false);
		let ctx = Self {
			deadline:  None,
			cancelled: Some(receiver),
		};
		(ctx, CancelHandle { sender })
	}

	pub fn with_timeout(self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Keeps the earlier of the existing and the new deadline.
	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(match self.deadline {
			Some(current) => current.min(deadline),
			None => deadline,
		});
		self
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Time left before the deadline, `Some(ZERO)` once it has passed.
	pub fn remaining(&self) -> Option<Duration> {
		self.deadline
			.map(|deadline| deadline.saturating_duration_since(Instant::now()))
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled
			.as_ref()
			.is_some_and(|receiver| *receiver.borrow())
	}

	/// Resolves once the context is cancelled. Pending forever for contexts
	/// without a cancel handle, or whose handle was dropped unused.
	pub async fn cancelled(&self) {
		let Some(receiver) = &self.cancelled else {
			return std::future::pending().await;
		};
		let mut receiver = receiver.clone();
		let sender_dropped =
			receiver.wait_for(|cancelled| *cancelled).await.is_err();
		if sender_dropped {
			std::future::pending::<()>().await;
		}
	}

	/// Resolves when the deadline passes. Pending forever without one.
	pub async fn expired(&self) {
		match self.deadline {
			Some(deadline) => tokio::time::sleep_until(deadline).await,
			None => std::future::pending().await,
		}
	}
}
