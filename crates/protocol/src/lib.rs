//! Wire types for the desktopd browser bridge.
//!
//! Every frame on the socket is a JSON text message tagged by `msg_type`:
//!
//! 1. The extension opens the socket and sends [`Envelope::Connect`]
//! 2. The extension sends an `init` [`BrowserEvent`] with every open tab
//! 3. Tab lifecycle changes follow as [`Envelope::BrowserMessage`]
//! 4. The daemon drives the browser with [`Envelope::CliRequest`]
//!
//! Unknown discriminators decode to an `Unknown` variant instead of failing,
//! so older extensions keep working against newer daemons.

mod command;
mod envelope;
mod event;
mod tab;

pub use command::CliRequest;
pub use envelope::{BROWSER_APPLICATION, Envelope, Handshake};
pub use event::{BrowserEvent, TabEventKind};
pub use tab::{Tab, TabId, WindowId};
