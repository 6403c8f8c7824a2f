// # UDP Record Resolver
//
// Published-record lookup for the dynup system, querying the configured
// resolver endpoint over UDP with `hickory-resolver`.
//
// ## Absent vs. failed
//
// A clean "no records" answer (NXDOMAIN or an empty answer section) maps
// to `Ok(None)`: the hostname has nothing published and the monitor loop
// treats it as stale. Transport problems and SERVFAIL map to
// `Error::Resolver`, which skips the label for one cycle.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use dynup_core::config::{IpFamily, RuntimeConfig};
use dynup_core::traits::RecordResolver;
use dynup_core::{Error, Result};
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{
    LookupIpStrategy, NameServerConfig, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::error::ResolveErrorKind;
use tracing::debug;

/// Record resolver querying one upstream endpoint over UDP
pub struct DnsRecordResolver {
    resolver: TokioAsyncResolver,
    family: IpFamily,
    endpoint: SocketAddr,
}

impl DnsRecordResolver {
    /// Create a resolver against the endpoint and family in `config`
    pub fn new(config: &RuntimeConfig) -> Self {
        let mut resolver_config = ResolverConfig::new();
        resolver_config
            .add_name_server(NameServerConfig::new(config.resolver_addr, Protocol::Udp));

        let mut opts = ResolverOpts::default();
        opts.ip_strategy = match config.ip_family {
            IpFamily::V4 => LookupIpStrategy::Ipv4Only,
            IpFamily::V6 => LookupIpStrategy::Ipv6Only,
        };
        // One lookup per label per cycle; answers must reflect what the
        // provider currently publishes, not what we saw last cycle.
        opts.cache_size = 0;

        Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
            family: config.ip_family,
            endpoint: config.resolver_addr,
        }
    }
}

#[async_trait]
impl RecordResolver for DnsRecordResolver {
    async fn resolve(&self, hostname: &str) -> Result<Option<IpAddr>> {
        // Trailing dot: query the name as given, no search-domain games
        let query = format!("{hostname}.");
        let lookup = match self.resolver.lookup_ip(query).await {
            Ok(lookup) => lookup,
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                debug!(%hostname, "no record published");
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::resolver(format!(
                    "lookup of {hostname} via {} failed: {e}",
                    self.endpoint
                )));
            }
        };

        let published = pick_address(lookup.iter(), self.family);
        debug!(%hostname, ?published, "published record resolved");
        Ok(published)
    }
}

/// Pick the first answer of the wanted family
///
/// The lookup strategy already restricts the query, but upstreams can
/// still answer with extra records of the other family.
fn pick_address(answers: impl Iterator<Item = IpAddr>, family: IpFamily) -> Option<IpAddr> {
    let mut answers = answers.filter(|ip| match family {
        IpFamily::V4 => ip.is_ipv4(),
        IpFamily::V6 => ip.is_ipv6(),
    });
    answers.next()
}
