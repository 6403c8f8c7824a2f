//! Per-domain reconciliation loop
//!
//! A [`DomainMonitor`] drives an unbounded sequence of poll cycles for one
//! [`MonitoredDomain`] until an unrecoverable fault occurs.
//!
//! ## Cycle Flow
//!
//! ```text
//! ┌────────────┐   current IP   ┌───────────────┐
//! │  IpSource  │───────────────▶│ DomainMonitor │
//! └────────────┘                └───────────────┘
//!                                       │ per label, in order
//!          ┌────────────────────────────┼────────────────────────────┐
//!          ▼                            ▼                            ▼
//! ┌────────────────┐          ┌─────────────────┐          ┌──────────────┐
//! │ RecordResolver │          │ UpdatePublisher │          │   Notifier   │
//! │ (published IP) │          │ (if stale)      │          │ (on success) │
//! └────────────────┘          └─────────────────┘          └──────────────┘
//! ```
//!
//! ## Failure Containment
//!
//! - IP discovery failure: the whole cycle is skipped
//! - One label's resolution or publish failure: that label is skipped,
//!   the rest of the cycle proceeds
//! - Fatal errors ([`crate::Error::is_fatal`]): the loop emits one [`LoopFault`]
//!   and stops; the Supervisor starts a replacement
//!
//! The cadence is fixed: the same sleep follows successful and failed
//! cycles, with no backoff and no jitter. The very first cycle runs
//! without any initial delay.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::{MonitoredDomain, RuntimeConfig};
use crate::error::Result;
use crate::traits::{IpSource, Notifier, RecordResolver, UpdatePublisher};

/// Signal that a monitor loop hit an unrecoverable fault
///
/// Emitted at most once per fault; the emitting loop performs no further
/// work. The Supervisor consumes it and starts a fresh loop for the same
/// domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopFault {
    /// The domain the faulted loop was monitoring
    pub domain: MonitoredDomain,
}

/// Reconciliation loop for one monitored domain
///
/// Holds read-only shared configuration and the four collaborator seams.
/// Execution within one monitor is strictly sequential: IP lookup, then
/// per-label checks in list order, then sleep. Monitors share no mutable
/// state with each other.
pub struct DomainMonitor {
    domain: MonitoredDomain,
    config: Arc<RuntimeConfig>,
    ip_source: Arc<dyn IpSource>,
    resolver: Arc<dyn RecordResolver>,
    publisher: Arc<dyn UpdatePublisher>,
    notifier: Arc<dyn Notifier>,
}

impl DomainMonitor {
    /// Create a monitor for one domain
    pub fn new(
        domain: MonitoredDomain,
        config: Arc<RuntimeConfig>,
        ip_source: Arc<dyn IpSource>,
        resolver: Arc<dyn RecordResolver>,
        publisher: Arc<dyn UpdatePublisher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            domain,
            config,
            ip_source,
            resolver,
            publisher,
            notifier,
        }
    }

    /// The domain this monitor is responsible for
    pub fn domain(&self) -> &MonitoredDomain {
        &self.domain
    }

    /// Run poll cycles until an unrecoverable fault occurs
    ///
    /// Never returns under normal operation. On a fatal error escaping a
    /// cycle, sends exactly one [`LoopFault`] on `fault_tx` and returns;
    /// the loop performs no further cycles afterwards.
    pub async fn run(self, fault_tx: mpsc::Sender<LoopFault>) {
        let mut first = true;
        loop {
            if !first {
                debug!(
                    domain = %self.domain.root(),
                    interval_secs = self.config.poll_interval.as_secs(),
                    "sleeping until next check"
                );
                tokio::time::sleep(self.config.poll_interval).await;
            }
            first = false;

            if let Err(e) = self.cycle().await {
                error!(domain = %self.domain.root(), error = %e, "monitor loop faulted");
                let fault = LoopFault {
                    domain: self.domain.clone(),
                };
                if fault_tx.send(fault).await.is_err() {
                    error!(
                        domain = %self.domain.root(),
                        "supervisor channel closed, fault not delivered"
                    );
                }
                return;
            }
        }
    }

    /// Run exactly one poll cycle
    ///
    /// Exposed for one-shot invocations and for tests that need a
    /// deterministic cycle boundary; continuous operation should go
    /// through [`DomainMonitor::run`]. Returns `Err` only for fatal
    /// errors, which `run` converts into a [`LoopFault`].
    pub async fn poll_once(&self) -> Result<()> {
        self.cycle().await
    }

    /// Run one poll cycle
    ///
    /// Transient failures are contained here; only fatal errors propagate
    /// to [`DomainMonitor::run`], which converts them into a [`LoopFault`].
    async fn cycle(&self) -> Result<()> {
        let current_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(
                    domain = %self.domain.root(),
                    error = %e,
                    "could not discover current IP, skipping cycle"
                );
                return Ok(());
            }
        };
        debug!(domain = %self.domain.root(), %current_ip, "current IP discovered");

        for label in self.domain.labels() {
            let hostname = self.domain.hostname(label);

            let published = match self.resolver.resolve(&hostname).await {
                Ok(published) => published,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(%hostname, error = %e, "record lookup failed, skipping label");
                    continue;
                }
            };

            if published == Some(current_ip) {
                debug!(%hostname, %current_ip, "record already current, skipping update");
                continue;
            }

            info!(
                %hostname,
                published = %published.map_or_else(|| "none".to_string(), |ip| ip.to_string()),
                new = %current_ip,
                "record stale, publishing update"
            );
            match self.publisher.publish(&hostname, current_ip).await {
                Ok(()) => {
                    self.notifier.notify(&hostname, current_ip).await;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    // Record stays stale; the next cycle re-attempts it.
                    warn!(%hostname, error = %e, "update not applied, will retry next cycle");
                }
            }
        }

        Ok(())
    }
}
