use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Source of delays for the reconnect loop.
pub trait Timer {
	fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()>;
}

#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(feature = "native")]
impl Timer for TokioTimer {
	fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
		Box::pin(tokio::time::sleep(delay))
	}
}
