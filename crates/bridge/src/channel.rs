//! Hand-off between host event callbacks and the session loop.
//!
//! Producers never wait on the socket: posting only appends to an unbounded
//! FIFO. The session drains it into `send`, so anything drained while no
//! socket is open is gone.

use futures::channel::mpsc;
use futures::stream::{FusedStream, Stream};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

/// Creates the producer/consumer pair.
pub fn relay_channel() -> (RelaySender, RelayReceiver) {
	let (tx, rx) = mpsc::unbounded();
	(RelaySender { tx }, RelayReceiver { rx })
}

/// Producer side, cloned into every host event handler.
#[derive(Debug, Clone)]
pub struct RelaySender {
	tx: mpsc::UnboundedSender<String>,
}

impl RelaySender {
	/// Posts a serialized frame. Returns `false` once the session is gone.
	pub fn post(&self, frame: String) -> bool {
		match self.tx.unbounded_send(frame) {
			Ok(()) => true,
			Err(_) => {
				debug!(target = "desktopd", "relay channel closed, dropping frame");
				false
			}
		}
	}
}

/// Consumer side, owned by the session.
#[derive(Debug)]
pub struct RelayReceiver {
	rx: mpsc::UnboundedReceiver<String>,
}

impl Stream for RelayReceiver {
	type Item = String;

	fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
		Pin::new(&mut self.rx).poll_next(cx)
	}
}

impl FusedStream for RelayReceiver {
	fn is_terminated(&self) -> bool {
		self.rx.is_terminated()
	}
}

#[cfg(test)]
mod tests {
	use futures::StreamExt;

	use super::*;

	#[tokio::test]
	async fn test_preserves_producer_order() {
		let (tx, mut rx) = relay_channel();
		let other = tx.clone();
		assert!(tx.post("one".into()));
		assert!(other.post("two".into()));
		assert!(tx.post("three".into()));

		assert_eq!(rx.next().await.as_deref(), Some("one"));
		assert_eq!(rx.next().await.as_deref(), Some("two"));
		assert_eq!(rx.next().await.as_deref(), Some("three"));
	}

	#[test]
	fn test_post_after_receiver_dropped() {
		let (tx, rx) = relay_channel();
		drop(rx);
		assert!(!tx.post("late".into()));
	}
}
