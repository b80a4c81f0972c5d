//! Connectivity probe used to gate the online install type.

use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

pub trait Connectivity: Send + Sync {
    fn has_internet(&self) -> bool;
}

impl<F> Connectivity for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn has_internet(&self) -> bool {
        self()
    }
}

/// Reports connectivity by opening a TCP connection to a well-known host.
#[derive(Debug, Clone)]
pub struct TcpConnectivity {
    pub addr: SocketAddr,
    pub timeout: Duration,
}

impl Default for TcpConnectivity {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::new(1, 1, 1, 1), 53)),
            timeout: Duration::from_secs(2),
        }
    }
}

impl Connectivity for TcpConnectivity {
    fn has_internet(&self) -> bool {
        match TcpStream::connect_timeout(&self.addr, self.timeout) {
            Ok(_) => true,
            Err(err) => {
                log::info!("No internet connectivity ({}): {}", self.addr, err);
                false
            }
        }
    }
}
