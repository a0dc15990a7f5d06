//! Host tab events to `browser_message` frames.

use desktopd_protocol::{BrowserEvent, Envelope, Tab, TabEventKind, TabId, WindowId};
use serde::Deserialize;
use serde_json::Value;
use tracing::{trace, warn};

use crate::channel::RelaySender;
use crate::host::TabEventSource;

/// `tabs.onActivated` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInfo {
	pub tab_id: TabId,
	pub window_id: WindowId,
}

/// `tabs.onAttached` second argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachInfo {
	pub new_window_id: WindowId,
	pub new_position: u32,
}

/// `tabs.onDetached` second argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachInfo {
	pub old_window_id: WindowId,
	pub old_position: u32,
}

/// `tabs.onHighlighted` argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightInfo {
	pub window_id: WindowId,
	pub tab_ids: Vec<TabId>,
}

/// `tabs.onMoved` second argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
	pub window_id: WindowId,
	pub from_index: u32,
	pub to_index: u32,
}

/// `tabs.onRemoved` second argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveInfo {
	pub window_id: WindowId,
	#[serde(default)]
	pub is_window_closing: bool,
}

/// Turns host notifications into frames on the relay channel.
///
/// Handlers are fire-and-forget: they never block and never report failure
/// back into the host's event dispatch.
#[derive(Debug, Clone)]
pub struct EventRelay {
	sender: RelaySender,
}

impl EventRelay {
	pub fn new(sender: RelaySender) -> Self {
		Self { sender }
	}

	/// Subscribes to every tab lifecycle event the bridge forwards.
	pub fn attach<S: TabEventSource + ?Sized>(&self, source: &S) {
		for kind in TabEventKind::ALL {
			source.subscribe(kind, self.clone());
		}
	}

	pub fn on_created(&self, tab: Tab) {
		self.emit(BrowserEvent::Created { data: tab });
	}

	pub fn on_activated(&self, info: ActiveInfo) {
		self.emit(BrowserEvent::Activated {
			tab_id: info.tab_id,
			window_id: info.window_id,
		});
	}

	pub fn on_attached(&self, tab_id: TabId, info: AttachInfo) {
		self.emit(BrowserEvent::Attached {
			tab_id,
			new_window_id: info.new_window_id,
			new_position: info.new_position,
		});
	}

	pub fn on_detached(&self, tab_id: TabId, info: DetachInfo) {
		self.emit(BrowserEvent::Detached {
			tab_id,
			old_window_id: info.old_window_id,
			old_position: info.old_position,
		});
	}

	pub fn on_highlighted(&self, info: HighlightInfo) {
		self.emit(BrowserEvent::Highlighted {
			window_id: info.window_id,
			tab_ids: info.tab_ids,
		});
	}

	pub fn on_moved(&self, tab_id: TabId, info: MoveInfo) {
		self.emit(BrowserEvent::Moved {
			tab_id,
			window_id: info.window_id,
			from_index: info.from_index,
			to_index: info.to_index,
		});
	}

	pub fn on_replaced(&self, added_tab_id: TabId, removed_tab_id: TabId) {
		self.emit(BrowserEvent::Replaced {
			added_tab_id,
			removed_tab_id,
		});
	}

	pub fn on_removed(&self, tab_id: TabId, info: RemoveInfo) {
		self.emit(BrowserEvent::Removed {
			tab_id,
			window_id: info.window_id,
		});
	}

	/// The change set is not forwarded; the daemon replaces its copy of the
	/// tab wholesale.
	pub fn on_updated(&self, _tab_id: TabId, _change_info: Value, tab: Tab) {
		self.emit(BrowserEvent::Updated { data: tab });
	}

	fn emit(&self, event: BrowserEvent) {
		let kind = event.kind();
		match Envelope::browser(event).to_json() {
			Ok(frame) => {
				trace!(target = "desktopd", kind = ?kind, "relaying tab event");
				self.sender.post(frame);
			}
			Err(err) => warn!(target = "desktopd", kind = ?kind, error = %err, "failed to serialize tab event"),
		}
	}
}
