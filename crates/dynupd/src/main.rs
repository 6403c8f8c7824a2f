// # dynupd - Dynamic-DNS Update Daemon
//
// Thin integration layer for the dynup system. All reconciliation logic
// lives in dynup-core; this binary only:
// 1. Reads configuration from environment variables
// 2. Initializes tracing and the tokio runtime
// 3. Wires the collaborators together
// 4. Runs the supervisor until a shutdown signal arrives
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `DYNUP_DOMAINS`: Monitored domains, `root=label,label;root=...`
//   syntax. The label `@` stands for the root domain itself.
//   Example: `example.com=@,www;example.org=@`
// - `DYNUP_CREDENTIAL`: Provider credential sent with every update
// - `DYNUP_INTERVAL_SECS`: Poll interval in seconds (default 300)
// - `DYNUP_RESOLVER`: Resolver endpoint as host:port (default 8.8.8.8:53)
// - `DYNUP_IP_FAMILY`: `ipv4` or `ipv6` (default ipv4)
// - `DYNUP_IP_URL`: HTTP echo service for public-IP discovery
//   (default https://api.ipify.org)
// - `DYNUP_USE_PROXY`: `true` to route HTTP through a proxy
// - `DYNUP_PROXY_URL`: Proxy URL, required with DYNUP_USE_PROXY
// - `DYNUP_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export DYNUP_DOMAINS="example.com=@,www"
// export DYNUP_CREDENTIAL=your_update_key
// export DYNUP_INTERVAL_SECS=300
//
// dynupd
// ```

use std::env;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dynup_core::config::{IpFamily, MonitoredDomain, RuntimeConfig};
use dynup_core::{LogNotifier, Supervisor};
use dynup_ip_http::{DEFAULT_IP_SERVICES, HttpIpSource};
use dynup_publisher_he::HePublisher;
use dynup_resolver_dns::DnsRecordResolver;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DynupExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DynupExitCode> for ExitCode {
    fn from(code: DynupExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration, as read from the environment
struct Config {
    domains: Vec<MonitoredDomain>,
    runtime: RuntimeConfig,
    ip_url: String,
    log_level: String,
}

impl Config {
    /// Load and validate configuration from environment variables
    fn from_env() -> Result<Self> {
        let domains_raw = env::var("DYNUP_DOMAINS").map_err(|_| {
            anyhow::anyhow!(
                "DYNUP_DOMAINS is required. \
                Set it via: export DYNUP_DOMAINS=\"example.com=@,www\""
            )
        })?;
        let domains = parse_domains(&domains_raw)?;

        let credential = env::var("DYNUP_CREDENTIAL").map_err(|_| {
            anyhow::anyhow!(
                "DYNUP_CREDENTIAL is required. \
                Set it via: export DYNUP_CREDENTIAL=your_update_key"
            )
        })?;

        let interval_secs: u64 = match env::var("DYNUP_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("DYNUP_INTERVAL_SECS must be an integer, got '{raw}'"))?,
            Err(_) => 300,
        };
        if interval_secs == 0 {
            anyhow::bail!("DYNUP_INTERVAL_SECS must be greater than zero");
        }

        let resolver_addr: SocketAddr = env::var("DYNUP_RESOLVER")
            .unwrap_or_else(|_| "8.8.8.8:53".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("DYNUP_RESOLVER must be host:port: {e}"))?;

        let ip_family = match env::var("DYNUP_IP_FAMILY")
            .unwrap_or_else(|_| "ipv4".to_string())
            .to_lowercase()
            .as_str()
        {
            "ipv4" | "v4" | "a" => IpFamily::V4,
            "ipv6" | "v6" | "aaaa" => IpFamily::V6,
            other => anyhow::bail!(
                "DYNUP_IP_FAMILY '{other}' is not valid. Valid values: ipv4, ipv6"
            ),
        };

        let use_proxy = env::var("DYNUP_USE_PROXY")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let proxy_url = env::var("DYNUP_PROXY_URL").ok();
        if use_proxy && proxy_url.as_deref().is_none_or(str::is_empty) {
            anyhow::bail!("DYNUP_PROXY_URL is required when DYNUP_USE_PROXY is set");
        }

        let ip_url =
            env::var("DYNUP_IP_URL").unwrap_or_else(|_| DEFAULT_IP_SERVICES[0].to_string());
        if !ip_url.starts_with("https://") && !ip_url.starts_with("http://") {
            anyhow::bail!("DYNUP_IP_URL must use HTTP or HTTPS scheme. Got: {ip_url}");
        }

        let log_level = env::var("DYNUP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        match log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "DYNUP_LOG_LEVEL '{other}' is not valid. \
                Valid levels: trace, debug, info, warn, error"
            ),
        }

        let runtime = RuntimeConfig {
            poll_interval: Duration::from_secs(interval_secs),
            credential,
            resolver_addr,
            ip_family,
            use_proxy,
            proxy_url,
        };
        runtime.validate()?;

        Ok(Self {
            domains,
            runtime,
            ip_url,
            log_level,
        })
    }
}

/// Parse the `DYNUP_DOMAINS` syntax: `root=label,label;root=...`
///
/// Domain entries are `;`-separated; each entry is a root name, `=`, and a
/// `,`-separated label list. Name validation is delegated to
/// [`MonitoredDomain::new`].
fn parse_domains(raw: &str) -> Result<Vec<MonitoredDomain>> {
    let mut domains = Vec::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (root, labels) = entry.split_once('=').ok_or_else(|| {
            anyhow::anyhow!(
                "DYNUP_DOMAINS entry '{entry}' is missing '='. \
                Expected: root=label,label"
            )
        })?;
        let labels: Vec<String> = labels
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        domains.push(MonitoredDomain::new(root.trim(), labels)?);
    }
    if domains.is_empty() {
        anyhow::bail!(
            "DYNUP_DOMAINS must contain at least one domain. \
            Set it via: export DYNUP_DOMAINS=\"example.com=@,www\""
        );
    }
    Ok(domains)
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return DynupExitCode::ConfigError.into();
        }
    };

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DynupExitCode::ConfigError.into();
    }

    info!("Starting dynupd daemon");
    info!(
        domains = config.domains.len(),
        interval_secs = config.runtime.poll_interval.as_secs(),
        "Configuration loaded"
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return DynupExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => DynupExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {e}");
                DynupExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire the collaborators and supervise the monitor loops
async fn run_daemon(config: Config) -> Result<()> {
    let runtime = Arc::new(config.runtime);

    let ip_source = Arc::new(HttpIpSource::new(&config.ip_url, &runtime)?);
    let resolver = Arc::new(DnsRecordResolver::new(&runtime));
    let publisher = Arc::new(HePublisher::new(Arc::clone(&runtime))?);
    let notifier = Arc::new(LogNotifier::new());

    let supervisor = Supervisor::new(runtime, ip_source, resolver, publisher, notifier);

    for domain in &config.domains {
        info!(
            domain = %domain.root(),
            labels = ?domain.labels(),
            "Monitoring domain"
        );
    }

    tokio::select! {
        _ = supervisor.run(config.domains) => {
            // The supervisor never returns under normal operation
            anyhow::bail!("supervisor stopped unexpectedly");
        }
        sig = wait_for_shutdown() => {
            let sig = sig?;
            info!("Received shutdown signal: {sig}");
            info!("Shutting down daemon");
            Ok(())
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {e}"))?;

    let sig = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(sig)
}

/// Wait for CTRL-C; fallback for non-Unix platforms
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {e}"))?;
    Ok("SIGINT")
}
