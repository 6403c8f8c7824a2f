// # HTTP IP Source
//
// Public-IP discovery via an HTTP echo service for the dynup system.
//
// ## Behavior
//
// One GET per `current()` call against a service that answers with the
// caller's address as plain text (e.g. api.ipify.org, ifconfig.me/ip,
// icanhazip.com). The response is trimmed, parsed, and checked against the
// configured address family. No caching and no polling here: the monitor
// loop owns the cadence and calls `current()` once per cycle.
//
// The HTTP client honors the shared proxy configuration, so discovery goes
// through the same proxy as update publication when one is configured.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use dynup_core::config::{IpFamily, RuntimeConfig};
use dynup_core::traits::IpSource;
use dynup_core::{Error, Result};
use tracing::debug;

/// Well-known echo services answering with a plain-text IP
pub const DEFAULT_IP_SERVICES: &[&str] = &[
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
];

/// Timeout for each discovery request
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// IP source backed by an HTTP echo service
pub struct HttpIpSource {
    url: String,
    family: IpFamily,
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// `url` is the echo-service endpoint; family filtering and proxy use
    /// come from `config`.
    pub fn new(url: impl Into<String>, config: &RuntimeConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(HTTP_TIMEOUT);
        if config.use_proxy {
            let proxy_url = config
                .proxy_url
                .as_deref()
                .ok_or_else(|| Error::config("use_proxy is set but proxy_url is empty"))?;
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| Error::config(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            family: config.ip_family,
            client,
        })
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ip_source(format!(
                "{} answered with status {status}",
                self.url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("failed to read response body: {e}")))?;

        let ip = parse_ip_response(&body, self.family)?;
        debug!(%ip, url = %self.url, "public IP discovered");
        Ok(ip)
    }
}

/// Parse an echo-service response body into an address of the wanted family
fn parse_ip_response(body: &str, family: IpFamily) -> Result<IpAddr> {
    let text = body.trim();
    let ip: IpAddr = text
        .parse()
        .map_err(|_| Error::ip_source(format!("service answered with non-IP text: '{text}'")))?;

    match family {
        IpFamily::V4 if !ip.is_ipv4() => Err(Error::ip_source(format!(
            "expected an IPv4 address, got {ip}"
        ))),
        IpFamily::V6 if !ip.is_ipv6() => Err(Error::ip_source(format!(
            "expected an IPv6 address, got {ip}"
        ))),
        _ => Ok(ip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ipv4_response_parses() {
        let ip = parse_ip_response("1.2.3.4", IpFamily::V4).unwrap();
        assert_eq!(ip, "1.2.3.4".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        // icanhazip.com answers with a trailing newline
        let ip = parse_ip_response("2001:db8::1\n", IpFamily::V6).unwrap();
        assert_eq!(ip, "2001:db8::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn wrong_family_is_rejected() {
        assert!(parse_ip_response("1.2.3.4", IpFamily::V6).is_err());
        assert!(parse_ip_response("2001:db8::1", IpFamily::V4).is_err());
    }

    #[test]
    fn non_ip_text_is_rejected() {
        assert!(parse_ip_response("<html>rate limited</html>", IpFamily::V4).is_err());
        assert!(parse_ip_response("", IpFamily::V4).is_err());
    }

    #[test]
    fn proxy_flag_without_url_fails_construction() {
        let config = RuntimeConfig {
            poll_interval: Duration::from_secs(300),
            credential: "secret".into(),
            resolver_addr: "8.8.8.8:53".parse().unwrap(),
            ip_family: IpFamily::V4,
            use_proxy: true,
            proxy_url: None,
        };
        assert!(HttpIpSource::new(DEFAULT_IP_SERVICES[0], &config).is_err());
    }
}
