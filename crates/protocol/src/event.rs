use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tab::{Tab, TabId, WindowId};

/// Payload of a `browser_message` envelope.
///
/// Each variant carries exactly the fields the browser reports for that
/// lifecycle event, plus the `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum BrowserEvent {
	/// Full tab inventory, sent once after every (re)connect.
	Init { data: Vec<Tab> },
	Created { data: Tab },
	Activated { tab_id: TabId, window_id: WindowId },
	Attached {
		tab_id: TabId,
		new_window_id: WindowId,
		new_position: u32,
	},
	Detached {
		tab_id: TabId,
		old_window_id: WindowId,
		old_position: u32,
	},
	Highlighted { window_id: WindowId, tab_ids: Vec<TabId> },
	Moved {
		tab_id: TabId,
		window_id: WindowId,
		from_index: u32,
		to_index: u32,
	},
	Replaced { added_tab_id: TabId, removed_tab_id: TabId },
	Removed { tab_id: TabId, window_id: WindowId },
	Updated { data: Tab },
}

impl BrowserEvent {
	/// The host event this message was produced from, or [`None`] for the
	/// `init` snapshot which has no host counterpart.
	pub fn kind(&self) -> Option<TabEventKind> {
		use BrowserEvent::*;
		let kind = match self {
			Init { .. } => return None,
			Created { .. } => TabEventKind::Created,
			Activated { .. } => TabEventKind::Activated,
			Attached { .. } => TabEventKind::Attached,
			Detached { .. } => TabEventKind::Detached,
			Highlighted { .. } => TabEventKind::Highlighted,
			Moved { .. } => TabEventKind::Moved,
			Replaced { .. } => TabEventKind::Replaced,
			Removed { .. } => TabEventKind::Removed,
			Updated { .. } => TabEventKind::Updated,
		};
		Some(kind)
	}
}

/// The tab lifecycle notifications the bridge subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabEventKind {
	Created,
	Activated,
	Attached,
	Detached,
	Highlighted,
	Moved,
	Replaced,
	Removed,
	Updated,
}

impl TabEventKind {
	pub const ALL: [TabEventKind; 9] = [
		TabEventKind::Created,
		TabEventKind::Activated,
		TabEventKind::Attached,
		TabEventKind::Detached,
		TabEventKind::Highlighted,
		TabEventKind::Moved,
		TabEventKind::Replaced,
		TabEventKind::Removed,
		TabEventKind::Updated,
	];

	/// Value of the `type` field for this kind.
	pub fn as_str(self) -> &'static str {
		match self {
			TabEventKind::Created => "created",
			TabEventKind::Activated => "activated",
			TabEventKind::Attached => "attached",
			TabEventKind::Detached => "detached",
			TabEventKind::Highlighted => "highlighted",
			TabEventKind::Moved => "moved",
			TabEventKind::Replaced => "replaced",
			TabEventKind::Removed => "removed",
			TabEventKind::Updated => "updated",
		}
	}
}

impl fmt::Display for TabEventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
