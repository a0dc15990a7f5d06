//! Socket seam between the session and the platform's WebSocket.
//!
//! A [`Connector`] opens sockets whose lifecycle is reported asynchronously,
//! the way a browser `WebSocket` fires `open`/`message`/`close`/`error`.
//! Every event is tagged with the generation the session assigned when it
//! opened the socket, so events from a superseded socket can be discarded.

#[cfg(feature = "native")]
mod tungstenite;

use futures::channel::mpsc;
#[cfg(feature = "native")]
pub use tungstenite::{TungsteniteConnector, TungsteniteSocket};

use crate::error::TransportError;

/// Lifecycle notification from a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
	Open,
	Message(String),
	Close { code: Option<u16>, reason: String },
	Error(String),
}

/// Where a socket reports its events.
#[derive(Debug, Clone)]
pub struct EventSink {
	generation: u64,
	tx: mpsc::UnboundedSender<(u64, SocketEvent)>,
}

impl EventSink {
	pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<(u64, SocketEvent)>) -> Self {
		Self { generation, tx }
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Reports an event. Silently dropped once the session is gone.
	pub fn emit(&self, event: SocketEvent) {
		let _ = self.tx.unbounded_send((self.generation, event));
	}
}

pub trait Socket {
	fn is_open(&self) -> bool;

	fn send_text(&self, text: &str) -> Result<(), TransportError>;

	/// Starts closing the socket. Calling it on a closed socket is a no-op.
	fn close(&self);
}

pub trait Connector {
	type Socket: Socket;

	/// Starts connecting to `url`. Success only means the attempt is under
	/// way; the outcome arrives on `events`.
	fn open(&self, url: &str, events: EventSink) -> Result<Self::Socket, TransportError>;
}
