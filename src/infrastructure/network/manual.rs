use crate::application::ports::connectivity::ConnectivitySignal;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Connectivity flag set by the host, e.g. from OS network callbacks or a test.
#[derive(Debug)]
pub struct ManualConnectivity {
    online: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConnectivitySignal for ManualConnectivity {
    async fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
