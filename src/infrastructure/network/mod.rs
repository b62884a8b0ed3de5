pub mod manual;
pub mod tcp_probe;

pub use manual::ManualConnectivity;
pub use tcp_probe::TcpConnectivityProbe;
