use serde::{Deserialize, Serialize};

/// What the UI badge renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityState {
    pub is_online: bool,
    pub pending_count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityChange {
    WentOnline,
    WentOffline,
}

impl ConnectivityChange {
    pub fn from_online(online: bool) -> Self {
        if online {
            ConnectivityChange::WentOnline
        } else {
            ConnectivityChange::WentOffline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ConnectivityChange::WentOnline)
    }
}
