//! Log-based notification sink
//!
//! The default [`Notifier`] implementation: announces applied updates as
//! structured log lines. Useful on its own and as the fallback when no
//! external sink is configured.

use async_trait::async_trait;
use std::net::IpAddr;
use tracing::info;

use crate::traits::Notifier;

/// Notifier that writes update announcements to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a new log notifier
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, hostname: &str, ip: IpAddr) {
        info!(%hostname, %ip, "record updated");
    }
}
