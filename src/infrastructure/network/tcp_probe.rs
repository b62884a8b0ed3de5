use crate::application::ports::connectivity::ConnectivitySignal;
use crate::shared::config::NetworkConfig;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Treats the device as online when a TCP connection to `address` opens in time.
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    address: String,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(
            config.probe_address.clone(),
            Duration::from_millis(config.probe_timeout_ms),
        )
    }
}

#[async_trait]
impl ConnectivitySignal for TcpConnectivityProbe {
    async fn is_online(&self) -> bool {
        match timeout(self.timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(err)) => {
                tracing::trace!(
                    target: "offline::connectivity",
                    address = %self.address,
                    error = %err,
                    "probe connect failed"
                );
                false
            }
            Err(_) => {
                tracing::trace!(
                    target: "offline::connectivity",
                    address = %self.address,
                    "probe timed out"
                );
                false
            }
        }
    }
}
