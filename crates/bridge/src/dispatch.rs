//! Inbound envelopes to host actions.

use std::rc::Rc;

use desktopd_protocol::{CliRequest, Envelope, TabId};
use tracing::{info, warn};

use crate::host::{HostAdapter, TabQuery, TabUpdate};

/// What the dispatcher did with an inbound envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
	/// A host action ran and succeeded.
	Handled,
	/// The daemon expects this envelope in return.
	Reply(Envelope),
	/// Recognized shape, but nothing handles it.
	Unhandled,
	/// The host action failed. Already logged; nothing goes back to the daemon.
	Failed,
}

pub struct CommandDispatcher<H> {
	host: Rc<H>,
}

impl<H: HostAdapter> CommandDispatcher<H> {
	pub fn new(host: Rc<H>) -> Self {
		Self { host }
	}

	pub async fn dispatch(&self, envelope: Envelope) -> Dispatched {
		match envelope {
			Envelope::CliRequest(request) => self.dispatch_cli_request(request).await,
			other => {
				info!(target = "desktopd", msg_type = other.msg_type(), "unhandled message");
				Dispatched::Unhandled
			}
		}
	}

	async fn dispatch_cli_request(&self, request: CliRequest) -> Dispatched {
		match request {
			CliRequest::FocusTab { tab_id, .. } => self.focus_tab(tab_id).await,
			CliRequest::ListTabs => match self.host.query_tabs(&TabQuery::all()).await {
				Ok(tabs) => Dispatched::Reply(Envelope::snapshot(tabs)),
				Err(err) => {
					warn!(target = "desktopd", error = %err, "list_tabs: tab query failed");
					Dispatched::Failed
				}
			},
			CliRequest::Unknown => {
				info!(target = "desktopd", "unhandled cli_request");
				Dispatched::Unhandled
			}
		}
	}

	async fn focus_tab(&self, tab_id: TabId) -> Dispatched {
		match self.host.update_tab(tab_id, &TabUpdate::activate()).await {
			Ok(tab) => {
				info!(target = "desktopd", tab_id, window_id = tab.window_id, "focused tab");
				Dispatched::Handled
			}
			Err(err) => {
				warn!(target = "desktopd", tab_id, error = %err, "focus_tab failed");
				Dispatched::Failed
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use desktopd_protocol::{BrowserEvent, Tab};

	use super::*;
	use crate::testing::{FakeHost, HostCall};

	fn dispatcher(host: &Rc<FakeHost>) -> CommandDispatcher<FakeHost> {
		CommandDispatcher::new(host.clone())
	}

	#[tokio::test]
	async fn test_focus_tab_activates_once() {
		let host = Rc::new(FakeHost::with_tabs(vec![Tab::new(7, 1, 0), Tab::new(8, 1, 1)]));

		let outcome = dispatcher(&host)
			.dispatch(Envelope::CliRequest(CliRequest::FocusTab {
				tab_id: 8,
				window_id: None,
			}))
			.await;

		assert_eq!(outcome, Dispatched::Handled);
		assert_eq!(host.calls(), vec![HostCall::Update(8, TabUpdate::activate())]);
	}

	#[tokio::test]
	async fn test_focus_missing_tab_is_logged_not_raised() {
		let host = Rc::new(FakeHost::with_tabs(vec![Tab::new(7, 1, 0)]));

		let outcome = dispatcher(&host)
			.dispatch(Envelope::CliRequest(CliRequest::FocusTab {
				tab_id: 99,
				window_id: Some(1),
			}))
			.await;

		assert_eq!(outcome, Dispatched::Failed);
		assert_eq!(host.calls(), vec![HostCall::Update(99, TabUpdate::activate())]);
	}

	#[tokio::test]
	async fn test_unknown_request_makes_no_host_call() {
		let host = Rc::new(FakeHost::default());

		let outcome = dispatcher(&host).dispatch(Envelope::CliRequest(CliRequest::Unknown)).await;

		assert_eq!(outcome, Dispatched::Unhandled);
		assert!(host.calls().is_empty());
	}

	#[tokio::test]
	async fn test_other_message_types_are_unhandled() {
		let host = Rc::new(FakeHost::default());
		let dispatcher = dispatcher(&host);

		assert_eq!(dispatcher.dispatch(Envelope::Unknown).await, Dispatched::Unhandled);
		assert_eq!(
			dispatcher.dispatch(Envelope::handshake("cli", "abc")).await,
			Dispatched::Unhandled
		);
		assert_eq!(
			dispatcher
				.dispatch(Envelope::browser(BrowserEvent::Replaced {
					added_tab_id: 1,
					removed_tab_id: 2
				}))
				.await,
			Dispatched::Unhandled
		);
		assert!(host.calls().is_empty());
	}

	#[tokio::test]
	async fn test_list_tabs_replies_with_snapshot() {
		let tabs = vec![Tab::new(1, 1, 0), Tab::new(2, 1, 1)];
		let host = Rc::new(FakeHost::with_tabs(tabs.clone()));

		let outcome = dispatcher(&host).dispatch(Envelope::CliRequest(CliRequest::ListTabs)).await;

		assert_eq!(outcome, Dispatched::Reply(Envelope::snapshot(tabs)));
		assert_eq!(host.calls(), vec![HostCall::Query(TabQuery::all())]);
	}

	#[tokio::test]
	async fn test_list_tabs_host_failure() {
		let host = Rc::new(FakeHost::default());
		host.fail_queries(true);

		let outcome = dispatcher(&host).dispatch(Envelope::CliRequest(CliRequest::ListTabs)).await;

		assert_eq!(outcome, Dispatched::Failed);
	}
}
