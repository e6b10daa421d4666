//! Connectivity source for details screens.
//!
//! The host (OS callback, RPC shell, test) reports online/offline here and
//! view-models follow it via `DetailsViewModel::follow_connectivity`.

use log::info;
use tokio::sync::watch;

/// Latest known connectivity, observable by any number of screens.
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(is_online: bool) -> Self {
        let (tx, _) = watch::channel(is_online);
        Self { tx }
    }

    /// Records a connectivity report. Returns whether the value changed;
    /// repeated reports of the same value are not forwarded.
    pub fn set_online(&self, is_online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == is_online {
                return false;
            }
            *current = is_online;
            true
        });
        if changed {
            info!("Connectivity changed: online={}", is_online);
        }
        changed
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
