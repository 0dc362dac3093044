//! Reverse lookup port.
//!
//! The DNS-backed implementation lives in `ipgate-core`; [`StaticReverseLookup`]
//! serves tests and `--no-dns` runs.

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;

#[async_trait]
pub trait ReverseLookup: Send + Sync {
    /// Hostname behind `ip`, or `None` on any failure.
    async fn lookup(&self, ip: IpAddr) -> Option<String>;
}

/// Map-backed lookup. An empty map never resolves anything.
#[derive(Debug, Clone, Default)]
pub struct StaticReverseLookup {
    records: HashMap<IpAddr, String>,
}

impl StaticReverseLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a PTR record; entries whose address does not parse are ignored.
    pub fn with(mut self, ip: &str, hostname: &str) -> Self {
        if let Ok(ip) = ip.parse::<IpAddr>() {
            self.insert(ip, hostname);
        }
        self
    }

    pub fn insert(&mut self, ip: IpAddr, hostname: impl Into<String>) {
        self.records.insert(ip, hostname.into());
    }
}

#[async_trait]
impl ReverseLookup for StaticReverseLookup {
    async fn lookup(&self, ip: IpAddr) -> Option<String> {
        self.records.get(&ip).cloned()
    }
}
