// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IP.
//
// ## Implementations
//
// - HTTP echo services: `dynup-ip-http` crate
// - Future: router APIs, interface inspection
//
// ## Responsibilities
//
// An IP source answers one question on demand: what is the public IP right
// now. It makes no decisions about whether an update is needed and carries
// no retry logic; a failed lookup is reported as an error and the monitor
// loop skips the cycle.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public-IP discovery implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// Failures are expected to be transient; return [`crate::Error::IpSource`]
/// and let the loop retry on its next cycle.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Discover the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current public IP
    /// - `Err(Error)`: If the lookup failed; the caller skips this cycle
    async fn current(&self) -> Result<IpAddr, crate::Error>;
}
