use std::time::Duration;

pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct Config {
    /// Disables reverse DNS lookups.
    ///
    /// Forwarded-for hops can then never be trusted, so the resolver always
    /// falls back to the direct remote address.
    pub no_dns: bool,
    /// Upper bound for a single reverse lookup.
    pub dns_timeout: Duration,
    /// How many `X-Forwarded-For` entries (counted from the right) are examined.
    ///
    /// `None` looks up every entry.
    pub max_forwarded_hops: Option<usize>,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_dns: false,
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            max_forwarded_hops: None,
            quiet: 0,
        }
    }
}
