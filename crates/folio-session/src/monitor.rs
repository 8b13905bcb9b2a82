//! Backend reachability probe.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use folio_client::ApiClient;
use folio_core::enums::Connectivity;
use serde::Serialize;
use tokio::sync::watch;

/// Last observed reachability, plus whether a probe is running right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConnectivityStatus {
    pub connectivity: Connectivity,
    pub checking: bool,
}

/// Answers "is the backend reachable right now" within a fixed deadline.
///
/// The monitor only ever writes its own status; sessions read it.
pub struct ConnectionMonitor {
    api: ApiClient,
    timeout: Duration,
    status: watch::Sender<ConnectivityStatus>,
    active_probes: AtomicUsize,
}

impl ConnectionMonitor {
    #[must_use]
    pub fn new(api: ApiClient, timeout: Duration) -> Self {
        Self {
            api,
            timeout,
            status: watch::Sender::new(ConnectivityStatus::default()),
            active_probes: AtomicUsize::new(0),
        }
    }

    /// Issue one `GET /health`. Any 2xx is `Reachable`; anything else,
    /// including running past the deadline, is `Unreachable`.
    pub async fn probe(&self) -> Connectivity {
        self.active_probes.fetch_add(1, Ordering::SeqCst);
        self.status.send_if_modified(|status| {
            let changed = !status.checking;
            status.checking = true;
            changed
        });

        let connectivity =
            match tokio::time::timeout(self.timeout, self.api.health(self.timeout)).await {
                Ok(Ok(())) => Connectivity::Reachable,
                Ok(Err(outcome)) => {
                    tracing::debug!(?outcome, "health probe failed");
                    Connectivity::Unreachable
                }
                Err(_) => {
                    tracing::debug!(timeout_secs = self.timeout.as_secs(), "health probe timed out");
                    Connectivity::Unreachable
                }
            };

        let still_running = self.active_probes.fetch_sub(1, Ordering::SeqCst) > 1;
        self.status.send_modify(|status| {
            status.connectivity = connectivity;
            status.checking = still_running;
        });
        tracing::info!(%connectivity, "backend connectivity probed");
        connectivity
    }

    #[must_use]
    pub fn connectivity(&self) -> Connectivity {
        self.status.borrow().connectivity
    }

    #[must_use]
    pub fn is_checking(&self) -> bool {
        self.status.borrow().checking
    }

    #[must_use]
    pub fn status(&self) -> ConnectivityStatus {
        *self.status.borrow()
    }

    /// Receive every status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityStatus> {
        self.status.subscribe()
    }
}
