//! Relay between a browser's tab events and the desktopd daemon.
//!
//! The crate is platform-neutral: the browser, the socket and the clock are
//! reached through [`HostAdapter`], [`Connector`] and [`Timer`]. The
//! `native` feature provides tokio-based implementations of the latter two;
//! the extension crate provides wasm ones.
//!
//! Wiring, in dependency order:
//!
//! ```text
//! TabEventSource -> EventRelay -> relay_channel -> Session -> Connector
//!                                                   Session -> CommandDispatcher -> HostAdapter
//! ```

pub mod channel;
pub mod config;
pub mod dispatch;
mod error;
pub mod host;
pub mod identity;
#[cfg(feature = "native")]
pub mod logging;
pub mod relay;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;
pub mod timer;
pub mod transport;

pub use channel::{RelayReceiver, RelaySender, relay_channel};
pub use config::BridgeConfig;
pub use dispatch::{CommandDispatcher, Dispatched};
pub use error::{BridgeError, HostError, Result, TransportError};
pub use host::{ExtensionInfo, HostAdapter, IdentityStore, TabEventSource, TabQuery, TabUpdate};
pub use relay::EventRelay;
pub use session::{Session, SessionState};
pub use timer::Timer;
pub use transport::{Connector, EventSink, Socket, SocketEvent};
