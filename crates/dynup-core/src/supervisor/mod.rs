//! Domain loop supervision
//!
//! The [`Supervisor`] runs one [`DomainMonitor`] task per monitored domain
//! and is the sole recovery mechanism for faulted loops: it receives each
//! [`LoopFault`] over an mpsc channel and spawns a replacement monitor for
//! the same domain, from the Start state.
//!
//! Loops carry no cycle-to-cycle state, so a restart needs nothing beyond
//! the domain itself. A loop that panics instead of reporting a fault is
//! detected through its join handle and restarted the same way, still
//! producing a single fault event.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::config::{MonitoredDomain, RuntimeConfig};
use crate::monitor::{DomainMonitor, LoopFault};
use crate::traits::{IpSource, Notifier, RecordResolver, UpdatePublisher};

/// Capacity of the fault channel; faults are rare, one slot per domain
/// plus headroom is plenty.
const FAULT_CHANNEL_CAPACITY: usize = 16;

/// Supervisor for a set of domain monitor loops
///
/// Owns the shared, read-only collaborators and configuration; every
/// spawned monitor receives clones of the same `Arc`s. Monitors share no
/// mutable state, so the supervisor needs no locking.
pub struct Supervisor {
    config: Arc<RuntimeConfig>,
    ip_source: Arc<dyn IpSource>,
    resolver: Arc<dyn RecordResolver>,
    publisher: Arc<dyn UpdatePublisher>,
    notifier: Arc<dyn Notifier>,
}

impl Supervisor {
    /// Create a supervisor over the shared collaborators
    pub fn new(
        config: Arc<RuntimeConfig>,
        ip_source: Arc<dyn IpSource>,
        resolver: Arc<dyn RecordResolver>,
        publisher: Arc<dyn UpdatePublisher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            ip_source,
            resolver,
            publisher,
            notifier,
        }
    }

    /// Run monitors for `domains` until the process shuts down
    ///
    /// Never returns under normal operation: the supervisor keeps the
    /// fault channel open and restarts any domain whose loop ends.
    pub async fn run(&self, domains: Vec<MonitoredDomain>) {
        self.run_internal(domains, None).await;
    }

    /// Test-only entry point with a controlled shutdown signal
    ///
    /// Production code should use [`Supervisor::run`]; shutdown there is
    /// process-level (the daemon selects on OS signals and drops the
    /// supervisor future).
    pub async fn run_with_shutdown(
        &self,
        domains: Vec<MonitoredDomain>,
        shutdown_rx: oneshot::Receiver<()>,
    ) {
        self.run_internal(domains, Some(shutdown_rx)).await;
    }

    async fn run_internal(
        &self,
        domains: Vec<MonitoredDomain>,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) {
        let (fault_tx, mut fault_rx) = mpsc::channel::<LoopFault>(FAULT_CHANNEL_CAPACITY);

        info!(domains = domains.len(), "starting domain monitors");
        for domain in domains {
            self.spawn_monitor(domain, fault_tx.clone());
        }

        if let Some(mut rx) = shutdown_rx {
            loop {
                tokio::select! {
                    Some(fault) = fault_rx.recv() => {
                        self.handle_fault(fault, &fault_tx);
                    }
                    _ = &mut rx => {
                        info!("shutdown signal received, supervisor stopping");
                        break;
                    }
                }
            }
        } else {
            // fault_tx is kept alive above, so recv never yields None here
            while let Some(fault) = fault_rx.recv().await {
                self.handle_fault(fault, &fault_tx);
            }
        }
    }

    fn handle_fault(&self, fault: LoopFault, fault_tx: &mpsc::Sender<LoopFault>) {
        warn!(domain = %fault.domain.root(), "monitor faulted, starting replacement loop");
        self.spawn_monitor(fault.domain, fault_tx.clone());
    }

    /// Spawn one monitor loop task for `domain`
    ///
    /// The monitor reports its own faults over the channel and then
    /// returns, so a normally-joined task needs no action here. A panicked
    /// task could not have reported, so the watcher converts the join
    /// error into the fault event itself, keeping one fault per event.
    fn spawn_monitor(&self, domain: MonitoredDomain, fault_tx: mpsc::Sender<LoopFault>) {
        let monitor = DomainMonitor::new(
            domain.clone(),
            Arc::clone(&self.config),
            Arc::clone(&self.ip_source),
            Arc::clone(&self.resolver),
            Arc::clone(&self.publisher),
            Arc::clone(&self.notifier),
        );

        let handle = tokio::spawn(monitor.run(fault_tx.clone()));

        tokio::spawn(async move {
            if let Err(join_err) = handle.await {
                if join_err.is_panic() {
                    error!(
                        domain = %domain.root(),
                        "monitor task panicked, reporting fault on its behalf"
                    );
                    let _ = fault_tx.send(LoopFault { domain }).await;
                }
            }
        });
    }
}
