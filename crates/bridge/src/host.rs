//! Seams to the browser the bridge runs in.
//!
//! The extension implements these over `chrome.tabs`, `chrome.runtime` and
//! `chrome.storage.local`; tests use the fakes in `testing`.

use async_trait::async_trait;
use desktopd_protocol::{Tab, TabEventKind, TabId, WindowId};
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::relay::EventRelay;

/// Filter for [`HostAdapter::query_tabs`]. The default matches every tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub active: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub current_window: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub window_id: Option<WindowId>,
}

impl TabQuery {
	pub fn all() -> Self {
		Self::default()
	}
}

/// Properties passed to [`HostAdapter::update_tab`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabUpdate {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub active: Option<bool>,
}

impl TabUpdate {
	pub fn activate() -> Self {
		Self { active: Some(true) }
	}
}

/// What the extension knows about itself (`chrome.runtime` manifest data).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionInfo {
	pub id: String,
	pub name: String,
	pub version: String,
}

#[async_trait(?Send)]
pub trait HostAdapter {
	async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<Tab>, HostError>;

	async fn update_tab(&self, tab_id: TabId, update: &TabUpdate) -> Result<Tab, HostError>;

	async fn extension_info(&self) -> Result<ExtensionInfo, HostError>;
}

/// Registers relay handlers with the host's tab event dispatch.
pub trait TabEventSource {
	/// Route every `kind` notification to the matching `relay.on_*` handler.
	fn subscribe(&self, kind: TabEventKind, relay: EventRelay);
}

/// Extension-local key-value storage.
#[async_trait(?Send)]
pub trait IdentityStore {
	async fn get(&self, key: &str) -> Result<Option<String>, HostError>;

	async fn set(&self, key: &str, value: &str) -> Result<(), HostError>;
}
