use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::system_conf;
use tracing::debug;

use ipgate_common::config::Config;
use ipgate_common::network::lookup::{ReverseLookup, StaticReverseLookup};

/// PTR lookups through the system resolver, each bounded by `timeout`.
pub struct DnsReverseLookup {
    resolver: TokioResolver,
    timeout: Duration,
}

impl DnsReverseLookup {
    /// Uses the system resolver configuration, or hickory's defaults when it
    /// cannot be read.
    pub fn new(timeout: Duration) -> Self {
        let config = match system_conf::read_system_conf() {
            Ok((config, _)) => config,
            Err(err) => {
                debug!("System resolver configuration unavailable ({err}), using defaults");
                ResolverConfig::default()
            }
        };

        Self::with_config(config, timeout)
    }

    pub fn with_config(config: ResolverConfig, timeout: Duration) -> Self {
        let resolver =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default()).build();

        Self { resolver, timeout }
    }
}

#[async_trait]
impl ReverseLookup for DnsReverseLookup {
    async fn lookup(&self, ip: IpAddr) -> Option<String> {
        let response =
            match tokio::time::timeout(self.timeout, self.resolver.reverse_lookup(ip)).await {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => {
                    debug!("Reverse lookup for {ip} failed: {err}");
                    return None;
                }
                Err(_) => {
                    debug!("Reverse lookup for {ip} timed out after {:?}", self.timeout);
                    return None;
                }
            };

        response
            .iter()
            .map(|ptr| trim_root(&ptr.to_string()))
            .find(|name| !name.is_empty())
    }
}

/// Chooses the lookup for a run: real DNS, or one that never resolves.
pub fn reverse_lookup(cfg: &Config) -> Box<dyn ReverseLookup> {
    if cfg.no_dns {
        Box::new(StaticReverseLookup::new())
    } else {
        Box::new(DnsReverseLookup::new(cfg.dns_timeout))
    }
}

fn trim_root(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
