// # Update Publisher Trait
//
// Defines the interface for pushing one DNS update to the provider.
//
// ## Implementations
//
// - Hurricane Electric dyn endpoint: `dynup-publisher-he` crate
//
// ## Constraints on implementations
//
// A publisher performs exactly one network call per invocation:
//
// - No retry or backoff logic; retry is the monitor loop's responsibility
//   via its next poll cycle
// - No caching or state; whether an update is needed is decided by the loop
// - No task spawning
//
// Success is defined purely by the transport-level response status. The
// provider's response body is opaque text, logged but never parsed for
// semantic content.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for provider update implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait UpdatePublisher: Send + Sync {
    /// Publish `ip` as the new address for `hostname`
    ///
    /// Exactly one request is sent. A transport error or a non-success
    /// status is returned as [`crate::Error::Publisher`]; the record then
    /// remains stale and is re-attempted on the caller's next cycle.
    async fn publish(&self, hostname: &str, ip: IpAddr) -> Result<(), crate::Error>;
}
