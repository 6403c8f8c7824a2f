// # Notifier Trait
//
// Defines the outbound notification sink invoked after a successful
// publish. Delivery is fire-and-forget: the loop does not depend on any
// return value, and a sink that fails should log and swallow the failure
// itself.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for notification sinks
///
/// Called once per successfully published update with the fully-qualified
/// hostname and the new address.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce that `hostname` now points at `ip`
    async fn notify(&self, hostname: &str, ip: IpAddr);
}
