use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
	#[error(transparent)]
	Transport(#[from] TransportError),

	#[error(transparent)]
	Host(#[from] HostError),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error("invalid endpoint: {endpoint}")]
	InvalidEndpoint {
		endpoint: String,
		#[source]
		source: url::ParseError,
	},

	#[error("unsupported endpoint scheme {scheme:?} (expected ws or wss)")]
	UnsupportedScheme { scheme: String },

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Failures of the socket layer. All of them are recovered by reconnecting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	#[error("failed to open socket: {0}")]
	Connect(String),

	#[error("socket is not open")]
	NotOpen,

	#[error("socket closed")]
	Closed,

	#[error("failed to send frame: {0}")]
	Send(String),
}

/// A host API call (tabs, storage, runtime) was rejected or unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct HostError {
	pub operation: &'static str,
	pub message: String,
}

impl HostError {
	pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
		Self {
			operation,
			message: message.into(),
		}
	}

	pub fn unavailable(operation: &'static str) -> Self {
		Self::new(operation, "host API unavailable")
	}

	pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
		Self::new(operation, reason)
	}
}
