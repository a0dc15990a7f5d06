use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Browser-assigned tab identifier.
pub type TabId = i64;

/// Browser-assigned window identifier.
pub type WindowId = i64;

/// A tab as reported by the browser's `tabs` API.
///
/// Only the fields the daemon indexes on are typed. Everything else the
/// browser reports (`pinned`, `status`, `favIconUrl`, ...) is carried in
/// [`extra`](Self::extra) so a tab survives the trip to the daemon intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
	/// Absent for tabs the browser does not expose through the tabs API
	/// (devtools windows, for example).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<TabId>,
	pub window_id: WindowId,
	pub index: u32,
	pub active: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Tab {
	pub fn new(id: TabId, window_id: WindowId, index: u32) -> Self {
		Self {
			id: Some(id),
			window_id,
			index,
			active: false,
			title: None,
			url: None,
			extra: Map::new(),
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	pub fn activated(mut self) -> Self {
		self.active = true;
		self
	}
}
