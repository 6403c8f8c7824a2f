//! Test doubles and common utilities for reconciliation contract tests
//!
//! These doubles record every call with atomic counters and argument logs
//! so tests can assert exact call counts and orderings without any real
//! network traffic.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dynup_core::config::{IpFamily, RuntimeConfig};
use dynup_core::error::{Error, Result};
use dynup_core::traits::{IpSource, Notifier, RecordResolver, UpdatePublisher};

/// A minimal RuntimeConfig for tests
pub fn test_config(poll_interval: Duration) -> RuntimeConfig {
    RuntimeConfig {
        poll_interval,
        credential: "test-credential".into(),
        resolver_addr: "127.0.0.1:53".parse().unwrap(),
        ip_family: IpFamily::V4,
        use_proxy: false,
        proxy_url: None,
    }
}

/// An IpSource that always reports the same address
pub struct StaticIpSource {
    ip: IpAddr,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// An IpSource whose every lookup fails transiently
pub struct FailingIpSource {
    call_count: Arc<AtomicUsize>,
}

impl FailingIpSource {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::ip_source("simulated lookup failure"))
    }
}

/// Outcome a [`ScriptedResolver`] produces for one hostname
#[derive(Debug, Clone, Copy)]
pub enum ResolveOutcome {
    /// The hostname resolves to this published address
    Published(IpAddr),
    /// The lookup succeeds but no record exists
    Absent,
    /// The lookup fails transiently
    Fail,
    /// The lookup blows up with an internal (fatal) error
    Fatal,
}

/// A RecordResolver driven by a hostname → outcome script
///
/// Hostnames without a scripted outcome resolve as absent. Every call is
/// recorded in order.
pub struct ScriptedResolver {
    script: Mutex<HashMap<String, ResolveOutcome>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set(&self, hostname: &str, outcome: ResolveOutcome) {
        self.script
            .lock()
            .unwrap()
            .insert(hostname.to_string(), outcome);
    }

    /// Hostnames looked up, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordResolver for ScriptedResolver {
    async fn resolve(&self, hostname: &str) -> Result<Option<IpAddr>> {
        self.calls.lock().unwrap().push(hostname.to_string());
        let outcome = self.script.lock().unwrap().get(hostname).copied();
        match outcome {
            Some(ResolveOutcome::Published(ip)) => Ok(Some(ip)),
            Some(ResolveOutcome::Absent) | None => Ok(None),
            Some(ResolveOutcome::Fail) => Err(Error::resolver("simulated lookup failure")),
            Some(ResolveOutcome::Fatal) => Err(Error::internal("simulated invariant violation")),
        }
    }
}

/// A RecordResolver whose first lookup blows up fatally; later lookups
/// succeed with no published record
pub struct FatalOnceResolver {
    call_count: Arc<AtomicUsize>,
}

impl FatalOnceResolver {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordResolver for FatalOnceResolver {
    async fn resolve(&self, _hostname: &str) -> Result<Option<IpAddr>> {
        if self.call_count.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(Error::internal("simulated invariant violation"))
        } else {
            Ok(None)
        }
    }
}

/// An UpdatePublisher that records every request
pub struct RecordingPublisher {
    /// Requests seen so far, as (hostname, ip) pairs in call order
    requests: Arc<Mutex<Vec<(String, IpAddr)>>>,
    /// When true, every publish fails transiently
    fail: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// A publisher whose every request is rejected by the provider
    pub fn failing() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn requests(&self) -> Vec<(String, IpAddr)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl UpdatePublisher for RecordingPublisher {
    async fn publish(&self, hostname: &str, ip: IpAddr) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push((hostname.to_string(), ip));
        if self.fail {
            Err(Error::publisher("simulated non-success status"))
        } else {
            Ok(())
        }
    }
}

/// A Notifier that records every announcement
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<(String, IpAddr)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn notifications(&self) -> Vec<(String, IpAddr)> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, hostname: &str, ip: IpAddr) {
        self.notifications
            .lock()
            .unwrap()
            .push((hostname.to_string(), ip));
    }
}

/// A Notifier whose first announcement panics; later ones are recorded
///
/// Used to drive the supervisor's panicked-task recovery path.
pub struct PanicOnceNotifier {
    call_count: Arc<AtomicUsize>,
    notifications: Arc<Mutex<Vec<(String, IpAddr)>>>,
}

impl PanicOnceNotifier {
    pub fn new() -> Self {
        Self {
            call_count: Arc::new(AtomicUsize::new(0)),
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn notifications(&self) -> Vec<(String, IpAddr)> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for PanicOnceNotifier {
    async fn notify(&self, hostname: &str, ip: IpAddr) {
        if self.call_count.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("simulated notifier crash");
        }
        self.notifications
            .lock()
            .unwrap()
            .push((hostname.to_string(), ip));
    }
}
