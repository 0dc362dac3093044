//! # Remote Address Resolver
//!
//! Picks the client address for a request that may have passed through
//! reverse proxies.
//!
//! A forwarded-for hop counts only if it has a PTR record. That is a weak
//! signal: it says nothing about whether the hop is a proxy we trust, so the
//! result must not be used as a security boundary on its own.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use ipgate_common::config::Config;
use ipgate_common::network::address::IpAddress;
use ipgate_common::network::lookup::ReverseLookup;

use crate::dns;

pub struct RemoteAddressResolver {
    lookup: Box<dyn ReverseLookup>,
    max_hops: Option<usize>,
    warned: AtomicBool,
}

impl RemoteAddressResolver {
    pub fn new(lookup: Box<dyn ReverseLookup>) -> Self {
        Self {
            lookup,
            max_hops: None,
            warned: AtomicBool::new(false),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let resolver = Self::new(dns::reverse_lookup(cfg));
        match cfg.max_forwarded_hops {
            Some(max_hops) => resolver.with_max_hops(max_hops),
            None => resolver,
        }
    }

    /// Only the right-most `max_hops` forwarded entries are looked up.
    ///
    /// Without a limit every entry is examined.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    /// Returns the right-most forwarded-for entry with a PTR record, or
    /// `remote_addr` (empty if absent) when there is none.
    pub async fn resolve(&self, forwarded_for: Option<&str>, remote_addr: Option<&str>) -> String {
        let fallback = remote_addr.unwrap_or_default().to_string();

        let Some(header) = forwarded_for.filter(|header| !header.trim().is_empty()) else {
            return fallback;
        };

        let candidates: Vec<&str> = header
            .split(',')
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty())
            .collect();

        let skipped = self
            .max_hops
            .map_or(0, |max_hops| candidates.len().saturating_sub(max_hops));
        if skipped > 0 {
            debug!("Ignoring {skipped} left-most forwarded-for entries");
        }

        // The last entry with a PTR record wins, so walk from the right and stop early.
        for candidate in candidates[skipped..].iter().rev() {
            if self.has_ptr_record(candidate).await {
                self.warn_once(candidate);
                return candidate.to_string();
            }
            debug!("Forwarded-for entry '{candidate}' has no PTR record");
        }

        fallback
    }

    async fn has_ptr_record(&self, candidate: &str) -> bool {
        match candidate.parse::<IpAddress>() {
            Ok(addr) => addr.resolve_hostname(self.lookup.as_ref()).await.is_some(),
            Err(_) => false,
        }
    }

    fn warn_once(&self, candidate: &str) {
        if !self.warned.swap(true, Ordering::Relaxed) {
            warn!("Using forwarded address {candidate}: a PTR record does not prove the proxy is trusted");
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
