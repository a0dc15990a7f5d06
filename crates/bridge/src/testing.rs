//! In-memory stand-ins for the browser, the socket and the clock.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use desktopd_protocol::{Tab, TabId};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::error::{HostError, TransportError};
use crate::host::{ExtensionInfo, HostAdapter, IdentityStore, TabQuery, TabUpdate};
use crate::timer::Timer;
use crate::transport::{Connector, EventSink, Socket, SocketEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorOp {
	Open(u64),
	Close(u64),
}

#[derive(Default)]
struct ConnectorInner {
	sockets: RefCell<Vec<FakeSocket>>,
	ops: RefCell<Vec<ConnectorOp>>,
	fail_next_open: Cell<bool>,
}

/// Records every socket it opens; tests drive them through [`FakeSocket`].
#[derive(Clone, Default)]
pub struct FakeConnector {
	inner: Rc<ConnectorInner>,
}

impl FakeConnector {
	pub fn opened(&self) -> usize {
		self.inner.sockets.borrow().len()
	}

	pub fn socket(&self, index: usize) -> FakeSocket {
		self.inner.sockets.borrow()[index].clone()
	}

	pub fn last(&self) -> FakeSocket {
		self.inner.sockets.borrow().last().cloned().expect("no socket opened")
	}

	pub fn ops(&self) -> Vec<ConnectorOp> {
		self.inner.ops.borrow().clone()
	}

	pub fn fail_next_open(&self) {
		self.inner.fail_next_open.set(true);
	}
}

impl Connector for FakeConnector {
	type Socket = FakeSocket;

	fn open(&self, _url: &str, events: EventSink) -> Result<FakeSocket, TransportError> {
		if self.inner.fail_next_open.replace(false) {
			return Err(TransportError::Connect("connection refused".into()));
		}
		self.inner.ops.borrow_mut().push(ConnectorOp::Open(events.generation()));
		let socket = FakeSocket {
			inner: Rc::new(SocketInner {
				events,
				open: Cell::new(false),
				sent: RefCell::new(Vec::new()),
				close_calls: Cell::new(0),
				ops: Rc::downgrade(&self.inner),
			}),
		};
		self.inner.sockets.borrow_mut().push(socket.clone());
		Ok(socket)
	}
}

struct SocketInner {
	events: EventSink,
	open: Cell<bool>,
	sent: RefCell<Vec<String>>,
	close_calls: Cell<usize>,
	ops: std::rc::Weak<ConnectorInner>,
}

#[derive(Clone)]
pub struct FakeSocket {
	inner: Rc<SocketInner>,
}

impl FakeSocket {
	/// The daemon accepted the connection.
	pub fn accept(&self) {
		self.inner.open.set(true);
		self.inner.events.emit(SocketEvent::Open);
	}

	/// The daemon sent a frame.
	pub fn deliver(&self, text: &str) {
		self.inner.events.emit(SocketEvent::Message(text.to_string()));
	}

	/// The daemon went away.
	pub fn drop_connection(&self) {
		self.inner.open.set(false);
		self.inner.events.emit(SocketEvent::Close {
			code: Some(1006),
			reason: String::new(),
		});
	}

	pub fn fail(&self, message: &str) {
		self.inner.events.emit(SocketEvent::Error(message.to_string()));
	}

	pub fn sent(&self) -> Vec<String> {
		self.inner.sent.borrow().clone()
	}

	pub fn sent_json(&self) -> Vec<Value> {
		self.sent()
			.iter()
			.map(|frame| serde_json::from_str(frame).expect("sent frame is not JSON"))
			.collect()
	}

	pub fn close_calls(&self) -> usize {
		self.inner.close_calls.get()
	}
}

impl Socket for FakeSocket {
	fn is_open(&self) -> bool {
		self.inner.open.get()
	}

	fn send_text(&self, text: &str) -> Result<(), TransportError> {
		if !self.is_open() {
			return Err(TransportError::NotOpen);
		}
		self.inner.sent.borrow_mut().push(text.to_string());
		Ok(())
	}

	fn close(&self) {
		self.inner.close_calls.set(self.inner.close_calls.get() + 1);
		self.inner.open.set(false);
		if let Some(connector) = self.inner.ops.upgrade() {
			connector
				.ops
				.borrow_mut()
				.push(ConnectorOp::Close(self.inner.events.generation()));
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
	Query(TabQuery),
	Update(TabId, TabUpdate),
	Info,
}

/// A browser with a fixed set of tabs.
#[derive(Default)]
pub struct FakeHost {
	tabs: RefCell<Vec<Tab>>,
	calls: RefCell<Vec<HostCall>>,
	fail_queries: Cell<bool>,
}

impl FakeHost {
	pub fn with_tabs(tabs: Vec<Tab>) -> Self {
		Self {
			tabs: RefCell::new(tabs),
			..Self::default()
		}
	}

	pub fn calls(&self) -> Vec<HostCall> {
		self.calls.borrow().clone()
	}

	pub fn updates(&self) -> Vec<TabId> {
		self.calls
			.borrow()
			.iter()
			.filter_map(|call| match call {
				HostCall::Update(id, _) => Some(*id),
				_ => None,
			})
			.collect()
	}

	pub fn fail_queries(&self, fail: bool) {
		self.fail_queries.set(fail);
	}
}

#[async_trait(?Send)]
impl HostAdapter for FakeHost {
	async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<Tab>, HostError> {
		self.calls.borrow_mut().push(HostCall::Query(query.clone()));
		if self.fail_queries.get() {
			return Err(HostError::unavailable("tabs.query"));
		}
		Ok(self.tabs.borrow().clone())
	}

	async fn update_tab(&self, tab_id: TabId, update: &TabUpdate) -> Result<Tab, HostError> {
		self.calls.borrow_mut().push(HostCall::Update(tab_id, update.clone()));
		let mut tabs = self.tabs.borrow_mut();
		let tab = tabs
			.iter_mut()
			.find(|tab| tab.id == Some(tab_id))
			.ok_or_else(|| HostError::rejected("tabs.update", format!("No tab with id: {tab_id}.")))?;
		if let Some(active) = update.active {
			tab.active = active;
		}
		Ok(tab.clone())
	}

	async fn extension_info(&self) -> Result<ExtensionInfo, HostError> {
		self.calls.borrow_mut().push(HostCall::Info);
		Ok(ExtensionInfo {
			id: "desktopd@test".into(),
			name: "desktopd".into(),
			version: "0.0.0".into(),
		})
	}
}

#[derive(Default)]
pub struct MemoryStore {
	values: RefCell<HashMap<String, String>>,
	writes: Cell<usize>,
	failing: bool,
}

impl MemoryStore {
	pub fn failing() -> Self {
		Self {
			failing: true,
			..Self::default()
		}
	}

	/// Seeds a value without counting it as a write.
	pub fn insert(&self, key: &str, value: &str) {
		self.values.borrow_mut().insert(key.to_string(), value.to_string());
	}

	pub fn writes(&self) -> usize {
		self.writes.get()
	}
}

#[async_trait(?Send)]
impl IdentityStore for MemoryStore {
	async fn get(&self, key: &str) -> Result<Option<String>, HostError> {
		if self.failing {
			return Err(HostError::unavailable("storage.local.get"));
		}
		Ok(self.values.borrow().get(key).cloned())
	}

	async fn set(&self, key: &str, value: &str) -> Result<(), HostError> {
		if self.failing {
			return Err(HostError::unavailable("storage.local.set"));
		}
		self.writes.set(self.writes.get() + 1);
		self.insert(key, value);
		Ok(())
	}
}

/// Timer whose sleeps only finish when the test fires them.
#[derive(Clone, Default)]
pub struct ManualTimer {
	sleeps: Rc<RefCell<Vec<(Duration, Option<oneshot::Sender<()>>)>>>,
}

impl ManualTimer {
	/// Every sleep ever requested.
	pub fn scheduled(&self) -> usize {
		self.sleeps.borrow().len()
	}

	/// Sleeps still being awaited by someone.
	pub fn pending(&self) -> usize {
		self.sleeps
			.borrow()
			.iter()
			.filter(|(_, tx)| tx.as_ref().is_some_and(|tx| !tx.is_canceled()))
			.count()
	}

	pub fn last_delay(&self) -> Option<Duration> {
		self.sleeps.borrow().last().map(|(delay, _)| *delay)
	}

	pub fn fire_all(&self) {
		for (_, tx) in self.sleeps.borrow_mut().iter_mut() {
			if let Some(tx) = tx.take() {
				let _ = tx.send(());
			}
		}
	}
}

impl Timer for ManualTimer {
	fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
		let (tx, rx) = oneshot::channel();
		self.sleeps.borrow_mut().push((delay, Some(tx)));
		Box::pin(async move {
			let _ = rx.await;
		})
	}
}
