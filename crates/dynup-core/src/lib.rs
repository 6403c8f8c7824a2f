// # dynup-core
//
// Core library for the polling dynamic-DNS updater.
//
// ## Architecture Overview
//
// This library provides the provider-agnostic reconciliation machinery:
// - **IpSource**: Trait for discovering the current public IP
// - **RecordResolver**: Trait for looking up the currently published IP
// - **UpdatePublisher**: Trait for pushing one update to the provider
// - **Notifier**: Trait for announcing applied updates
// - **DomainMonitor**: The per-domain reconciliation loop
// - **Supervisor**: Spawns one monitor per domain and restarts faulted ones
//
// ## Failure Containment
//
// The loop distinguishes three failure tiers:
// 1. IP discovery failure skips the whole cycle
// 2. A single label's resolution or publish failure skips that label only
// 3. Anything else ends the loop with a `LoopFault` handed to the Supervisor
//
// Tiers 1 and 2 are recovered by the next scheduled cycle; tier 3 is
// recovered by the Supervisor spawning a replacement monitor.

pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod supervisor;
pub mod traits;

// Re-export core types for convenience
pub use config::{IpFamily, MonitoredDomain, RuntimeConfig, ROOT_LABEL};
pub use error::{Error, Result};
pub use monitor::{DomainMonitor, LoopFault};
pub use notify::LogNotifier;
pub use supervisor::Supervisor;
pub use traits::{IpSource, Notifier, RecordResolver, UpdatePublisher};
