//! Background service worker: relays `chrome.tabs` to the desktopd daemon.

mod chrome;
mod host;
mod logging;
mod socket;
mod timer;

use std::rc::Rc;

use anyhow::Context;
use desktopd_bridge::{identity, relay_channel, BridgeConfig, EventRelay, Session};
use tracing::{error, warn};
use wasm_bindgen::prelude::*;

pub use host::{ChromeStorage, ChromeTabs};
pub use socket::{BrowserSocket, WebSocketConnector};
pub use timer::BrowserTimer;

/// `chrome.storage.local` key holding an optional [`BridgeConfig`] override.
const CONFIG_KEY: &str = "desktopd_config";

#[wasm_bindgen(start)]
pub async fn start() {
    console_error_panic_hook::set_once();
    logging::init_logging();

    if let Err(err) = run().await {
        error!(target = "desktopd", error = %format!("{err:#}"), "bridge stopped");
    }
}

async fn run() -> anyhow::Result<()> {
    // Service worker listeners have to be registered before the first await.
    let (tx, rx) = relay_channel();
    EventRelay::new(tx).attach(&ChromeTabs);

    let storage = ChromeStorage;
    let config = load_config(&storage).await;
    let client_id = identity::resolve(&storage, &config.identity_key).await;

    let session = Session::new(config, client_id, WebSocketConnector, Rc::new(ChromeTabs), BrowserTimer, rx)
        .context("invalid bridge configuration")?;
    session.run().await;
    Ok(())
}

async fn load_config(storage: &ChromeStorage) -> BridgeConfig {
    let stored = match storage.get_value(CONFIG_KEY).await {
        Ok(value) => value,
        Err(err) => {
            warn!(target = "desktopd", error = %err, "could not read stored config, using defaults");
            return BridgeConfig::default();
        }
    };
    if stored.is_undefined() || stored.is_null() {
        return BridgeConfig::default();
    }
    let config = match serde_wasm_bindgen::from_value::<BridgeConfig>(stored) {
        Ok(config) => config,
        Err(err) => {
            warn!(target = "desktopd", error = %err, "ignoring malformed stored config");
            return BridgeConfig::default();
        }
    };
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            warn!(target = "desktopd", error = %err, "ignoring invalid stored config");
            BridgeConfig::default()
        }
    }
}
