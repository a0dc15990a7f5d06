use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Level used when `RUST_LOG` is unset.
pub fn default_level(verbosity: u8) -> LevelFilter {
	match verbosity {
		0 => LevelFilter::WARN,
		// connection lifecycle
		1 => LevelFilter::INFO,
		2 => LevelFilter::DEBUG,
		// every relayed frame
		_ => LevelFilter::TRACE,
	}
}

/// Installs a compact stderr subscriber. A no-op if one is already set.
pub fn init_logging(verbosity: u8) {
	let filter = EnvFilter::builder()
		.with_default_directive(default_level(verbosity).into())
		.from_env_lossy();

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.compact()
		.try_init();
}
