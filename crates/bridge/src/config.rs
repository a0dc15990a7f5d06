//! Bridge configuration.
//!
//! Every field has a default matching the stock daemon setup, so an empty
//! JSON object (or no stored config at all) yields a working bridge.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BridgeError, Result};

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080";
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1_000;
pub const DEFAULT_IDENTITY_KEY: &str = "desktopd_client_id";

pub const ENDPOINT_ENV: &str = "DESKTOPD_ENDPOINT";
pub const RECONNECT_DELAY_ENV: &str = "DESKTOPD_RECONNECT_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
	/// WebSocket URL of the daemon.
	pub endpoint: String,
	/// Fixed delay between a disconnect and the next connection attempt.
	pub reconnect_delay_ms: u64,
	/// Value of `application` in the connect handshake.
	pub application: String,
	/// Storage key the client identity is persisted under.
	pub identity_key: String,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
			application: desktopd_protocol::BROWSER_APPLICATION.to_string(),
			identity_key: DEFAULT_IDENTITY_KEY.to_string(),
		}
	}
}

impl BridgeConfig {
	pub fn reconnect_delay(&self) -> Duration {
		Duration::from_millis(self.reconnect_delay_ms)
	}

	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into();
		self
	}

	pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
		self.reconnect_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
		self
	}

	/// Defaults overridden by `DESKTOPD_ENDPOINT` and
	/// `DESKTOPD_RECONNECT_DELAY_MS` when set.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// [`from_env`](Self::from_env) with an arbitrary variable source.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let mut config = Self::default();
		if let Some(endpoint) = lookup(ENDPOINT_ENV) {
			config.endpoint = endpoint;
		}
		if let Some(delay) = lookup(RECONNECT_DELAY_ENV) {
			config.reconnect_delay_ms = delay
				.trim()
				.parse()
				.map_err(|_| BridgeError::InvalidConfig(format!("{RECONNECT_DELAY_ENV} must be an integer, got {delay:?}")))?;
		}
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		let url = Url::parse(&self.endpoint).map_err(|source| BridgeError::InvalidEndpoint {
			endpoint: self.endpoint.clone(),
			source,
		})?;
		if !matches!(url.scheme(), "ws" | "wss") {
			return Err(BridgeError::UnsupportedScheme {
				scheme: url.scheme().to_string(),
			});
		}
		if self.reconnect_delay_ms == 0 {
			return Err(BridgeError::InvalidConfig(
				"reconnectDelayMs must be greater than zero".to_string(),
			));
		}
		if self.application.is_empty() {
			return Err(BridgeError::InvalidConfig("application must not be empty".to_string()));
		}
		if self.identity_key.is_empty() {
			return Err(BridgeError::InvalidConfig("identityKey must not be empty".to_string()));
		}
		Ok(())
	}
}
