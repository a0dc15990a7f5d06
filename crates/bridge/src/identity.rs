//! Stable client identifier sent in every handshake.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::HostError;
use crate::host::IdentityStore;

/// Reads the stored identity, creating and persisting one on first run.
pub async fn load_or_create<S: IdentityStore + ?Sized>(store: &S, key: &str) -> Result<String, HostError> {
	if let Some(id) = store.get(key).await? {
		if !id.is_empty() {
			return Ok(id);
		}
	}

	let id = Uuid::new_v4().to_string();
	store.set(key, &id).await?;
	info!(target = "desktopd", client_id = %id, "created client identity");
	Ok(id)
}

/// Like [`load_or_create`], but never fails: when storage is unavailable the
/// returned id only lives as long as this process.
pub async fn resolve<S: IdentityStore + ?Sized>(store: &S, key: &str) -> String {
	match load_or_create(store, key).await {
		Ok(id) => id,
		Err(err) => {
			let id = Uuid::new_v4().to_string();
			warn!(target = "desktopd", error = %err, client_id = %id, "identity storage failed, using ephemeral id");
			id
		}
	}
}
