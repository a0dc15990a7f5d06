use serde::{Deserialize, Serialize};

use crate::command::CliRequest;
use crate::event::BrowserEvent;
use crate::tab::Tab;

/// Application name the extension announces itself with.
pub const BROWSER_APPLICATION: &str = "browser";

/// Top-level message exchanged with the daemon, tagged by `msg_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg_type", rename_all = "snake_case")]
pub enum Envelope {
	/// First frame on every connection.
	Connect(Handshake),
	/// Tab lifecycle event or snapshot, extension to daemon.
	BrowserMessage { data: BrowserEvent },
	/// Command, daemon to extension.
	CliRequest(CliRequest),
	/// A `msg_type` this build does not understand. Receivers ignore it.
	#[serde(other)]
	Unknown,
}

/// Identification sent once per connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
	pub application: String,
	/// Stable per browser profile so the daemon can correlate reconnects.
	pub id: String,
}

impl Handshake {
	pub fn browser(id: impl Into<String>) -> Self {
		Self {
			application: BROWSER_APPLICATION.to_string(),
			id: id.into(),
		}
	}
}

impl Envelope {
	pub fn handshake(application: impl Into<String>, id: impl Into<String>) -> Self {
		Envelope::Connect(Handshake {
			application: application.into(),
			id: id.into(),
		})
	}

	pub fn browser(event: BrowserEvent) -> Self {
		Envelope::BrowserMessage { data: event }
	}

	/// The `init` message carrying the complete tab inventory.
	pub fn snapshot(tabs: Vec<Tab>) -> Self {
		Envelope::browser(BrowserEvent::Init { data: tabs })
	}

	pub fn msg_type(&self) -> &'static str {
		match self {
			Envelope::Connect(_) => "connect",
			Envelope::BrowserMessage { .. } => "browser_message",
			Envelope::CliRequest(_) => "cli_request",
			Envelope::Unknown => "unknown",
		}
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}

	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};

	use super::*;

	fn to_value(envelope: &Envelope) -> Value {
		serde_json::from_str(&envelope.to_json().unwrap()).unwrap()
	}

	#[test]
	fn test_handshake_wire_format() {
		let envelope = Envelope::Connect(Handshake::browser("c0ffee"));
		assert_eq!(
			to_value(&envelope),
			json!({"msg_type": "connect", "application": "browser", "id": "c0ffee"})
		);
	}

	#[test]
	fn test_snapshot_wire_format() {
		let tabs = vec![Tab::new(1, 10, 0).activated(), Tab::new(2, 10, 1)];
		assert_eq!(
			to_value(&Envelope::snapshot(tabs)),
			json!({
				"msg_type": "browser_message",
				"data": {
					"type": "init",
					"data": [
						{"id": 1, "windowId": 10, "index": 0, "active": true},
						{"id": 2, "windowId": 10, "index": 1, "active": false}
					]
				}
			})
		);
	}

	#[test]
	fn test_relay_wire_format() {
		let envelope = Envelope::browser(BrowserEvent::Activated {
			tab_id: 5,
			window_id: 2,
		});
		assert_eq!(
			to_value(&envelope),
			json!({
				"msg_type": "browser_message",
				"data": {"type": "activated", "tabId": 5, "windowId": 2}
			})
		);
	}

	#[test]
	fn test_parse_focus_tab() {
		let envelope = Envelope::from_json(r#"{"msg_type":"cli_request","cli_request":"focus_tab","tabId":42}"#).unwrap();
		assert_eq!(
			envelope,
			Envelope::CliRequest(CliRequest::FocusTab {
				tab_id: 42,
				window_id: None
			})
		);
	}

	#[test]
	fn test_parse_focus_tab_with_window() {
		let envelope =
			Envelope::from_json(r#"{"msg_type":"cli_request","cli_request":"focus_tab","tabId":42,"windowId":3}"#).unwrap();
		assert_eq!(
			envelope,
			Envelope::CliRequest(CliRequest::FocusTab {
				tab_id: 42,
				window_id: Some(3)
			})
		);
	}

	#[test]
	fn test_parse_list_tabs() {
		let envelope = Envelope::from_json(r#"{"msg_type":"cli_request","cli_request":"list_tabs"}"#).unwrap();
		assert_eq!(envelope, Envelope::CliRequest(CliRequest::ListTabs));
	}

	#[test]
	fn test_unknown_discriminators_are_not_errors() {
		let envelope = Envelope::from_json(r#"{"msg_type":"client_list","data":[]}"#).unwrap();
		assert_eq!(envelope, Envelope::Unknown);

		let envelope = Envelope::from_json(r#"{"msg_type":"cli_request","cli_request":"close_tab","tabId":1}"#).unwrap();
		assert_eq!(envelope, Envelope::CliRequest(CliRequest::Unknown));
	}

	#[test]
	fn test_missing_discriminator_is_an_error() {
		assert!(Envelope::from_json(r#"{"cli_request":"focus_tab","tabId":1}"#).is_err());
		assert!(Envelope::from_json(r#"{"msg_type":"cli_request","tabId":1}"#).is_err());
		assert!(Envelope::from_json("not json").is_err());
	}

	#[test]
	fn test_focus_tab_requires_tab_id() {
		assert!(Envelope::from_json(r#"{"msg_type":"cli_request","cli_request":"focus_tab"}"#).is_err());
	}
}
