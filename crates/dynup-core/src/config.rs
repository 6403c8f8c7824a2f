//! Configuration types for the dynup system
//!
//! This module defines the two long-lived configuration structures:
//! [`RuntimeConfig`], shared read-only by every monitor loop, and
//! [`MonitoredDomain`], one per loop. Both are constructed at startup
//! and never mutated afterwards, so no synchronization is needed.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Sentinel label that stands for the root domain itself.
///
/// When building hostnames, update requests, and notifications this label
/// is rendered as the bare root domain name, never as `"@.<root>"`.
pub const ROOT_LABEL: &str = "@";

/// IP address family to discover and publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    /// IPv4 (A records)
    V4,
    /// IPv6 (AAAA records)
    V6,
}

/// Process-wide runtime configuration
///
/// Built once at startup, shared read-only across every monitor loop via
/// `Arc`. Ownership of mutation never leaves startup code, so loops need
/// no locking to read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Fixed interval between poll cycles
    ///
    /// The same interval is used after successful and failed cycles:
    /// cadence is not adaptive, no backoff and no jitter.
    pub poll_interval: Duration,

    /// Provider credential sent with every update request
    pub credential: String,

    /// DNS resolver endpoint used to look up published records
    pub resolver_addr: SocketAddr,

    /// Address family to keep in sync
    pub ip_family: IpFamily,

    /// Whether outbound HTTP requests go through the configured proxy
    pub use_proxy: bool,

    /// Proxy URL, required when `use_proxy` is set
    pub proxy_url: Option<String>,
}

impl RuntimeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval.is_zero() {
            return Err(crate::Error::config("poll interval must be greater than zero"));
        }
        if self.credential.is_empty() {
            return Err(crate::Error::config("credential cannot be empty"));
        }
        if self.use_proxy && self.proxy_url.as_ref().is_none_or(|u| u.is_empty()) {
            return Err(crate::Error::config(
                "proxy_url is required when use_proxy is enabled",
            ));
        }
        Ok(())
    }
}

/// One monitored domain: a root name plus the labels kept in sync
///
/// Immutable for the lifetime of a monitor loop; owned by the Supervisor
/// and read-only to the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredDomain {
    root: String,
    labels: Vec<String>,
}

impl MonitoredDomain {
    /// Create a validated monitored domain
    ///
    /// Labels are kept in the given order; [`ROOT_LABEL`] denotes the root
    /// domain itself. Rejects empty or duplicate labels and names that do
    /// not look like DNS names (RFC 1035 shape checks).
    pub fn new(
        root: impl Into<String>,
        labels: Vec<String>,
    ) -> Result<Self, crate::Error> {
        let root = root.into();
        validate_dns_name(&root)?;

        if labels.is_empty() {
            return Err(crate::Error::config(format!(
                "domain {root} has no labels to monitor"
            )));
        }
        for (i, label) in labels.iter().enumerate() {
            if label != ROOT_LABEL {
                validate_label(label)?;
            }
            if labels[..i].contains(label) {
                return Err(crate::Error::config(format!(
                    "duplicate label '{label}' for domain {root}"
                )));
            }
        }

        Ok(Self { root, labels })
    }

    /// The root domain name
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The monitored labels, in configuration order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Render the fully-qualified hostname for a label
    ///
    /// The root sentinel yields the bare root domain name.
    pub fn hostname(&self, label: &str) -> String {
        if label == ROOT_LABEL {
            self.root.clone()
        } else {
            format!("{}.{}", label, self.root)
        }
    }
}

/// Validate a full DNS name (RFC 1035: 253 chars total, labels of 1-63
/// alphanumeric-or-hyphen chars, no leading/trailing hyphen).
fn validate_dns_name(name: &str) -> Result<(), crate::Error> {
    if name.is_empty() {
        return Err(crate::Error::config("domain name cannot be empty"));
    }
    if name.len() > 253 {
        return Err(crate::Error::config(format!(
            "domain name too long: {} chars (max 253)",
            name.len()
        )));
    }
    for label in name.split('.') {
        validate_label(label)?;
    }
    Ok(())
}

fn validate_label(label: &str) -> Result<(), crate::Error> {
    if label.is_empty() {
        return Err(crate::Error::config("DNS label cannot be empty"));
    }
    if label.len() > 63 {
        return Err(crate::Error::config(format!(
            "DNS label too long: {} chars (max 63): '{label}'",
            label.len()
        )));
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(crate::Error::config(format!(
            "DNS label contains invalid characters: '{label}'"
        )));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(crate::Error::config(format!(
            "DNS label cannot start or end with a hyphen: '{label}'"
        )));
    }
    Ok(())
}
