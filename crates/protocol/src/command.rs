use serde::{Deserialize, Serialize};

use crate::tab::{TabId, WindowId};

/// A command sent by the daemon, discriminated by the `cli_request` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cli_request", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CliRequest {
	/// Make the given tab the active tab of its window.
	FocusTab {
		tab_id: TabId,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		window_id: Option<WindowId>,
	},
	/// Ask for a fresh `init` snapshot without reconnecting.
	ListTabs,
	/// Any request this build does not know about.
	#[serde(other)]
	Unknown,
}

impl CliRequest {
	pub fn name(&self) -> &'static str {
		match self {
			CliRequest::FocusTab { .. } => "focus_tab",
			CliRequest::ListTabs => "list_tabs",
			CliRequest::Unknown => "unknown",
		}
	}
}
