//! Online/offline signal.
//!
//! The sync engine reads the signal once at the start of each operation.
//! Subscribers are notified when it flips, which is what UIs use to
//! trigger a re-fetch.

use tokio::sync::watch;

use crate::remote::RemoteStore;

#[derive(Clone)]
pub struct Connectivity {
    tx: watch::Sender<bool>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Connectivity { tx }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the signal. Subscribers only hear about actual changes.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            if *current == online {
                return false;
            }
            *current = online;
            true
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Set the signal from whether `remote` answers a ping. Returns the new state.
    pub async fn probe<R: RemoteStore + ?Sized>(&self, remote: &R) -> bool {
        let online = match remote.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::info!(error = %e, "remote unreachable, working offline");
                false
            }
        };
        self.set_online(online);
        online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Failure, MemoryRemote};

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let connectivity = Connectivity::new(false);
        let mut rx = connectivity.subscribe();

        connectivity.set_online(false);
        assert!(!rx.has_changed().unwrap());

        connectivity.set_online(true);
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
        assert!(connectivity.is_online());
    }

    #[tokio::test]
    async fn test_probe_follows_remote() {
        let remote = MemoryRemote::new();
        let connectivity = Connectivity::new(false);

        assert!(connectivity.probe(&remote).await);
        assert!(connectivity.is_online());

        remote.set_failure(Failure::All).await;
        assert!(!connectivity.probe(&remote).await);
        assert!(!connectivity.is_online());
    }
}
