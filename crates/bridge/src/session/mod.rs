//! Connection lifecycle with the daemon.
//!
//! A [`Session`] owns the only socket, the consumer end of the relay channel
//! and the reconnect timer. All transitions happen inside [`Session::step`],
//! which waits for one of:
//!
//! - a socket event (`open`, `message`, `close`, `error`)
//! - a relayed frame to forward
//! - the reconnect timer
//!
//! and applies it. [`Session::run`] is `connect` followed by `step` forever.
//!
//! ```text
//! Disconnected --connect--> Connecting --open--> Connected
//!      ^                        |                    |
//!      +------ close/error -----+-------------------+
//!      |
//!      +-- reconnect timer --> Connecting
//! ```


use std::rc::Rc;

use desktopd_protocol::Envelope;
use futures::channel::mpsc;
use futures::future::{Fuse, FusedFuture, FutureExt, LocalBoxFuture};
use futures::{StreamExt, select_biased};
use tracing::{debug, info, trace, warn};

use crate::channel::RelayReceiver;
use crate::config::BridgeConfig;
use crate::dispatch::{CommandDispatcher, Dispatched};
use crate::error::Result;
use crate::host::{HostAdapter, TabQuery};
use crate::timer::Timer;
use crate::transport::{Connector, EventSink, Socket, SocketEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Disconnected,
	Connecting,
	Connected,
}

enum Step {
	Socket(u64, SocketEvent),
	Outbound(Option<String>),
	Reconnect,
}

pub struct Session<C: Connector, H, T> {
	config: BridgeConfig,
	client_id: String,
	connector: C,
	host: Rc<H>,
	dispatcher: CommandDispatcher<H>,
	timer: T,
	outbound: RelayReceiver,
	events_tx: mpsc::UnboundedSender<(u64, SocketEvent)>,
	events_rx: mpsc::UnboundedReceiver<(u64, SocketEvent)>,
	socket: Option<C::Socket>,
	generation: u64,
	state: SessionState,
	reconnect: Fuse<LocalBoxFuture<'static, ()>>,
}

impl<C, H, T> Session<C, H, T>
where
	C: Connector,
	H: HostAdapter,
	T: Timer,
{
	pub fn new(
		config: BridgeConfig,
		client_id: impl Into<String>,
		connector: C,
		host: Rc<H>,
		timer: T,
		outbound: RelayReceiver,
	) -> Result<Self> {
		config.validate()?;
		let (events_tx, events_rx) = mpsc::unbounded();
		Ok(Self {
			config,
			client_id: client_id.into(),
			connector,
			dispatcher: CommandDispatcher::new(host.clone()),
			host,
			timer,
			outbound,
			events_tx,
			events_rx,
			socket: None,
			generation: 0,
			state: SessionState::Disconnected,
			reconnect: Fuse::terminated(),
		})
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	/// Incremented on every connection attempt.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	pub fn reconnect_pending(&self) -> bool {
		!self.reconnect.is_terminated()
	}

	/// Connects, then processes events until the extension is unloaded.
	pub async fn run(mut self) {
		match self.host.extension_info().await {
			Ok(ext) => info!(
				target = "desktopd",
				extension = %ext.id,
				name = %ext.name,
				version = %ext.version,
				client_id = %self.client_id,
				"starting bridge"
			),
			Err(err) => debug!(target = "desktopd", error = %err, "extension info unavailable"),
		}

		self.connect();
		loop {
			self.step().await;
		}
	}

	/// Replaces the current socket (if any) with a fresh connection attempt.
	///
	/// Cancels a pending reconnect, so at most one timer and one socket are
	/// ever alive.
	pub fn connect(&mut self) {
		self.reconnect = Fuse::terminated();
		if let Some(previous) = self.socket.take() {
			debug!(target = "desktopd", generation = self.generation, "closing superseded socket");
			previous.close();
		}

		self.generation += 1;
		self.state = SessionState::Connecting;
		info!(target = "desktopd", endpoint = %self.config.endpoint, generation = self.generation, "connecting");

		let sink = EventSink::new(self.generation, self.events_tx.clone());
		match self.connector.open(&self.config.endpoint, sink) {
			Ok(socket) => self.socket = Some(socket),
			Err(err) => {
				warn!(target = "desktopd", error = %err, "failed to open socket");
				self.state = SessionState::Disconnected;
				self.schedule_reconnect();
			}
		}
	}

	/// Waits for the next event and applies it.
	pub async fn step(&mut self) {
		let step = select_biased! {
			event = self.events_rx.next() => match event {
				Some((generation, event)) => Step::Socket(generation, event),
				None => Step::Outbound(None),
			},
			() = &mut self.reconnect => Step::Reconnect,
			frame = self.outbound.next() => Step::Outbound(frame),
		};

		match step {
			Step::Socket(generation, event) => self.handle_socket_event(generation, event).await,
			Step::Outbound(Some(frame)) => self.send(&frame),
			Step::Outbound(None) => debug!(target = "desktopd", "relay channel closed"),
			Step::Reconnect => self.connect(),
		}
	}

	/// Forwards a serialized frame if connected. Otherwise the frame is
	/// dropped; there is no outbound queue.
	pub fn send(&self, frame: &str) {
		match &self.socket {
			Some(socket) if self.state == SessionState::Connected && socket.is_open() => {
				if let Err(err) = socket.send_text(frame) {
					warn!(target = "desktopd", error = %err, "send failed");
				}
			}
			_ => trace!(target = "desktopd", state = ?self.state, "not connected, dropping frame"),
		}
	}

	fn send_envelope(&self, envelope: &Envelope) {
		match envelope.to_json() {
			Ok(frame) => self.send(&frame),
			Err(err) => warn!(target = "desktopd", msg_type = envelope.msg_type(), error = %err, "failed to serialize"),
		}
	}

	async fn handle_socket_event(&mut self, generation: u64, event: SocketEvent) {
		if generation != self.generation {
			trace!(target = "desktopd", generation, current = self.generation, "ignoring event from superseded socket");
			return;
		}

		match event {
			SocketEvent::Open => self.on_open().await,
			SocketEvent::Message(text) => self.on_message(&text).await,
			SocketEvent::Close { code, reason } => {
				info!(target = "desktopd", ?code, %reason, "socket closed");
				self.disconnect();
			}
			SocketEvent::Error(message) => {
				warn!(target = "desktopd", error = %message, "socket error, closing");
				self.disconnect();
			}
		}
	}

	async fn on_open(&mut self) {
		self.state = SessionState::Connected;
		info!(target = "desktopd", generation = self.generation, "connected");

		self.send_envelope(&Envelope::handshake(&self.config.application, &self.client_id));

		match self.host.query_tabs(&TabQuery::all()).await {
			Ok(tabs) => {
				debug!(target = "desktopd", count = tabs.len(), "sending tab snapshot");
				self.send_envelope(&Envelope::snapshot(tabs));
			}
			Err(err) => warn!(target = "desktopd", error = %err, "tab snapshot failed"),
		}
	}

	async fn on_message(&mut self, text: &str) {
		let envelope = match Envelope::from_json(text) {
			Ok(envelope) => envelope,
			Err(err) => {
				warn!(target = "desktopd", error = %err, frame = %text, "dropping malformed message");
				return;
			}
		};
		debug!(target = "desktopd", msg_type = envelope.msg_type(), "received");

		if let Dispatched::Reply(reply) = self.dispatcher.dispatch(envelope).await {
			self.send_envelope(&reply);
		}
	}

	fn disconnect(&mut self) {
		if let Some(socket) = self.socket.take() {
			socket.close();
		}
		self.state = SessionState::Disconnected;
		self.schedule_reconnect();
	}

	fn schedule_reconnect(&mut self) {
		if self.reconnect_pending() {
			debug!(target = "desktopd", "reconnect already scheduled");
			return;
		}
		let delay = self.config.reconnect_delay();
		info!(target = "desktopd", delay_ms = delay.as_millis() as u64, "scheduling reconnect");
		self.reconnect = self.timer.sleep(delay).fuse();
	}
}
