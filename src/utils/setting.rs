// pgdump-etl/src/utils/setting.rs
use tokio::net::TcpStream;
use tracing::{info, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub reachable: bool,
}

/// Advisory TCP reachability check for a database endpoint.
///
/// Uses the OS default connect timeout and drops the socket right away. A
/// failure is only logged; nothing downstream is blocked by it.
pub async fn check_db_connection(host: &str, port: u16) -> ProbeOutcome {
    match TcpStream::connect((host, port)).await {
        Ok(stream) => {
            drop(stream);
            info!("Connection success. {}:{}", host, port);
            ProbeOutcome { reachable: true }
        }
        Err(source) => {
            let warning = AppError::Connectivity {
                host: host.to_string(),
                port,
                source,
            };
            warn!("⚠️ {}", warning);
            ProbeOutcome { reachable: false }
        }
    }
}
