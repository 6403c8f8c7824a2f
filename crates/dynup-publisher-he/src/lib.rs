// # Hurricane Electric Update Publisher
//
// Pushes dynamic-DNS updates to the he.net dyn endpoint.
//
// ## Wire protocol
//
// One form-encoded POST per update to `https://dyn.dns.he.net/nic/update`
// with fields `hostname`, `password`, `myip`. A 2xx status is the sole
// success signal. The response body ("good 1.2.3.4", "nochg", "badauth",
// ...) is provider vocabulary this publisher does not interpret; it is
// logged verbatim and otherwise ignored.
//
// ## Constraints
//
// This publisher is single-shot and stateless:
// - one network call per `publish` invocation, no retry and no backoff
//   (the monitor loop re-attempts on its next cycle)
// - no caching, no task spawning
// - a transport error and a non-2xx status are both reported as
//   `Error::Publisher`, i.e. "update not applied"
//
// ## Security
//
// The credential never appears in logs; the Debug impl redacts it.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dynup_core::config::RuntimeConfig;
use dynup_core::traits::UpdatePublisher;
use dynup_core::{Error, Result};
use tracing::{info, warn};

/// The he.net dynamic-DNS update endpoint
pub const HE_UPDATE_URL: &str = "https://dyn.dns.he.net/nic/update";

/// Timeout for each update request
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Update publisher for the he.net dyn endpoint
pub struct HePublisher {
    endpoint: String,
    config: Arc<RuntimeConfig>,
    client: reqwest::Client,
}

impl std::fmt::Debug for HePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HePublisher")
            .field("endpoint", &self.endpoint)
            .field("credential", &"<REDACTED>")
            .finish()
    }
}

impl HePublisher {
    /// Create a publisher against the he.net endpoint
    pub fn new(config: Arc<RuntimeConfig>) -> Result<Self> {
        Self::with_endpoint(HE_UPDATE_URL, config)
    }

    /// Create a publisher against a custom endpoint
    ///
    /// The endpoint is fixed per publisher; this exists for self-hosted
    /// mirrors of the protocol and for validation against a local server.
    pub fn with_endpoint(endpoint: impl Into<String>, config: Arc<RuntimeConfig>) -> Result<Self> {
        if config.credential.is_empty() {
            return Err(Error::config("publisher credential cannot be empty"));
        }

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
            endpoint: endpoint.into(),
            config,
            client,
        })
    }
}

#[async_trait]
impl UpdatePublisher for HePublisher {
    async fn publish(&self, hostname: &str, ip: IpAddr) -> Result<()> {
        let form = update_form(hostname, &self.config.credential, ip);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::publisher(format!("update request failed: {e}")))?;

        let status = response.status();
        // Body is informational only; log it, never parse it
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            info!(%hostname, %ip, provider_response = %body.trim(), "update accepted");
            Ok(())
        } else {
            warn!(%hostname, %status, provider_response = %body.trim(), "update rejected");
            Err(Error::publisher(format!(
                "provider answered with status {status}"
            )))
        }
    }
}

/// Build the form fields for one update request
fn update_form(hostname: &str, credential: &str, ip: IpAddr) -> [(&'static str, String); 3] {
    [
        ("hostname", hostname.to_string()),
        ("password", credential.to_string()),
        ("myip", ip.to_string()),
    ]
}
