//! Collaborator traits for the reconciliation loop
//!
//! These are the seams between the provider-agnostic core and the
//! environment it observes and acts on:
//!
//! - [`IpSource`]: Discover the caller's current public IP
//! - [`RecordResolver`]: Look up the IP currently published for a hostname
//! - [`UpdatePublisher`]: Push one update to the DNS provider
//! - [`Notifier`]: Announce an applied update

pub mod ip_source;
pub mod notifier;
pub mod record_resolver;
pub mod update_publisher;

pub use ip_source::IpSource;
pub use notifier::Notifier;
pub use record_resolver::RecordResolver;
pub use update_publisher::UpdatePublisher;
