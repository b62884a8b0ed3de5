use async_trait::async_trait;

/// The platform's view of network reachability, read at call time.
#[async_trait]
pub trait ConnectivitySignal: Send + Sync {
    async fn is_online(&self) -> bool;
}
