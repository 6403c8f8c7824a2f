// # Record Resolver Trait
//
// Defines the interface for looking up the IP currently published for a
// hostname, i.e. the last value the provider accepted and propagated.
//
// ## Implementations
//
// - UDP queries against a configured resolver: `dynup-resolver-dns` crate
//
// ## Absent vs. failed
//
// A resolver distinguishes "the lookup worked and no record exists"
// (`Ok(None)`, the record is stale and will be published) from "the lookup
// failed" (`Err`, the label is skipped for this cycle only).

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for published-record lookup implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// They perform exactly one lookup per call and never retry internally.
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Resolve the IP currently published for `hostname`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(IpAddr))`: The published address
    /// - `Ok(None)`: The lookup succeeded but no record is published
    /// - `Err(Error)`: The lookup failed; the caller skips this label
    async fn resolve(&self, hostname: &str) -> Result<Option<IpAddr>, crate::Error>;
}
