use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use super::{Connector, EventSink, Socket, SocketEvent};
use crate::error::TransportError;

/// Native transport: each socket is driven by its own tokio task.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl Connector for TungsteniteConnector {
	type Socket = TungsteniteSocket;

	fn open(&self, url: &str, events: EventSink) -> Result<TungsteniteSocket, TransportError> {
		let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
		let open = Arc::new(AtomicBool::new(false));

		tokio::spawn(drive_socket(url.to_string(), events, outbound_rx, open.clone()));

		Ok(TungsteniteSocket { outbound: outbound_tx, open })
	}
}

#[derive(Debug)]
pub struct TungsteniteSocket {
	outbound: mpsc::UnboundedSender<Message>,
	open: Arc<AtomicBool>,
}

impl Socket for TungsteniteSocket {
	fn is_open(&self) -> bool {
		self.open.load(Ordering::SeqCst)
	}

	fn send_text(&self, text: &str) -> Result<(), TransportError> {
		if !self.is_open() {
			return Err(TransportError::NotOpen);
		}
		self.outbound
			.send(Message::Text(text.to_string()))
			.map_err(|_| TransportError::Closed)
	}

	fn close(&self) {
		if self.open.swap(false, Ordering::SeqCst) {
			let _ = self.outbound.send(Message::Close(None));
		}
	}
}

async fn drive_socket(
	url: String,
	events: EventSink,
	mut outbound: mpsc::UnboundedReceiver<Message>,
	open: Arc<AtomicBool>,
) {
	let stream = match connect_async(url.as_str()).await {
		Ok((stream, _)) => stream,
		Err(err) => {
			events.emit(SocketEvent::Error(err.to_string()));
			return;
		}
	};

	open.store(true, Ordering::SeqCst);
	events.emit(SocketEvent::Open);

	let (mut write, mut read) = stream.split();
	loop {
		tokio::select! {
			msg = outbound.recv() => {
				let Some(msg) = msg else {
					let _ = write.send(Message::Close(None)).await;
					break;
				};
				let closing = matches!(msg, Message::Close(_));
				if let Err(err) = write.send(msg).await {
					events.emit(SocketEvent::Error(err.to_string()));
					break;
				}
				if closing {
					events.emit(SocketEvent::Close { code: Some(1000), reason: String::new() });
					break;
				}
			}
			frame = read.next() => match frame {
				Some(Ok(Message::Text(text))) => events.emit(SocketEvent::Message(text)),
				Some(Ok(Message::Close(frame))) => {
					let (code, reason) = frame
						.map(|f| (Some(u16::from(f.code)), f.reason.into_owned()))
						.unwrap_or((None, String::new()));
					events.emit(SocketEvent::Close { code, reason });
					break;
				}
				Some(Ok(_)) => {}
				Some(Err(err)) => {
					events.emit(SocketEvent::Error(err.to_string()));
					break;
				}
				None => {
					events.emit(SocketEvent::Close { code: None, reason: "stream ended".to_string() });
					break;
				}
			}
		}
	}

	open.store(false, Ordering::SeqCst);
	debug!(target = "desktopd", generation = events.generation(), "socket task finished");
}
