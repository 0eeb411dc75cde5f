use crate::store::Store;

/// Removes expired and revoked auth sessions. Reads already filter these
/// out, so the sweep only reclaims space and is safe to run at any time.
pub fn run(store: &Store) {
    match store.cleanup_expired_auth_sessions() {
        Ok(0) => tracing::debug!("Session sweep found nothing to remove"),
        Ok(removed) => tracing::info!(removed, "Session sweep removed stale sessions"),
        Err(e) => tracing::error!(error = %e, "Session sweep failed"),
    }
}
