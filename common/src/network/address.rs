//! # IP Address Model
//!
//! [`IpAddress`] keeps an address in its canonical binary form: 4 bytes for
//! IPv4, 16 bytes for IPv6. Values are never mutated; anonymizing returns a
//! new address.
//!
//! Two families of constructors exist:
//! * **Strict**: [`str::parse`] / `TryFrom<&[u8]>`, returning an error.
//! * **Lenient**: [`IpAddress::from_string`] / [`IpAddress::from_binary`],
//!   which fall back to `0.0.0.0` instead of failing. Settings sanitizers and
//!   access gates rely on this never erroring.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use tracing::debug;

use crate::error::AddressError;
use crate::network::lookup::ReverseLookup;
use crate::network::range::{self, IpRange};

pub const IPV4_LEN: usize = 4;
pub const IPV6_LEN: usize = 16;

/// Prefix kept when anonymizing a plain IPv6 address, indexed by byte count.
const IPV6_ANONYMIZE_PREFIXES: [u8; 4] = [128, 64, 48, 40];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpAddress {
    V4([u8; IPV4_LEN]),
    V6([u8; IPV6_LEN]),
}

impl IpAddress {
    /// `0.0.0.0`, returned whenever lenient parsing has nothing to work with.
    pub const UNSPECIFIED: IpAddress = IpAddress::V4([0; IPV4_LEN]);

    /// Parses dotted-quad or colon-hex text, never failing.
    ///
    /// Empty or malformed input yields [`IpAddress::UNSPECIFIED`].
    pub fn from_string(text: &str) -> Self {
        match text.parse::<IpAddress>() {
            Ok(addr) => addr,
            Err(AddressError::Empty) => Self::UNSPECIFIED,
            Err(err) => {
                debug!("{err}, using {}", Self::UNSPECIFIED);
                Self::UNSPECIFIED
            }
        }
    }

    /// Builds an address from raw bytes, dispatching on length.
    ///
    /// Lengths other than 4 or 16 yield [`IpAddress::UNSPECIFIED`].
    pub fn from_binary(bytes: &[u8]) -> Self {
        match Self::try_from(bytes) {
            Ok(addr) => addr,
            Err(AddressError::BadLength(0)) => Self::UNSPECIFIED,
            Err(err) => {
                debug!("{err}, using {}", Self::UNSPECIFIED);
                Self::UNSPECIFIED
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IpAddress::V4(bytes) => bytes,
            IpAddress::V6(bytes) => bytes,
        }
    }

    pub fn to_binary(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn byte_len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self, IpAddress::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, IpAddress::V6(_))
    }

    /// True for `::ffff:a.b.c.d` and the all-zero `::a.b.c.d` form.
    ///
    /// `::` and `::1` are treated as plain IPv6.
    pub fn is_ipv4_embedded(&self) -> bool {
        match self {
            IpAddress::V4(_) => false,
            IpAddress::V6(bytes) => has_ipv4_prefix(bytes),
        }
    }

    /// The IPv4 address this address represents, if any.
    pub fn to_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            IpAddress::V4(bytes) => Some(Ipv4Addr::from(*bytes)),
            IpAddress::V6(bytes) if has_ipv4_prefix(bytes) => {
                Some(Ipv4Addr::new(bytes[12], bytes[13], bytes[14], bytes[15]))
            }
            IpAddress::V6(_) => None,
        }
    }

    /// Dotted-quad text for native or IPv4-mapped addresses, `None` otherwise.
    ///
    /// `::` and `::1` are plain IPv6 (unspecified and loopback), not the
    /// IPv4-compatible `0.0.0.0` and `0.0.0.1`. The same rule decides whether
    /// [`IpAddress::anonymize`] treats an address as IPv4.
    pub fn to_ipv4_text(&self) -> Option<String> {
        self.to_ipv4().map(|ipv4| ipv4.to_string())
    }

    /// Reverse lookup of this address.
    ///
    /// Returns `None` when the lookup fails or only echoes the address back,
    /// which means there is no real PTR record.
    pub async fn resolve_hostname(&self, lookup: &dyn ReverseLookup) -> Option<String> {
        let hostname = lookup.lookup(IpAddr::from(*self)).await?;
        if hostname.is_empty() || hostname == self.to_text() {
            return None;
        }
        Some(hostname)
    }

    /// Unsigned big-endian `low <= self <= high`; false on length mismatch.
    pub fn is_between(&self, low: &[u8], high: &[u8]) -> bool {
        let bytes = self.as_bytes();
        bytes.len() == low.len() && bytes.len() == high.len() && low <= bytes && bytes <= high
    }

    pub fn is_in_range(&self, range: &IpRange) -> bool {
        self.is_between(range.low().as_bytes(), range.high().as_bytes())
    }

    pub fn is_in_any_range<'a, I>(&self, ranges: I) -> bool
    where
        I: IntoIterator<Item = &'a IpRange>,
    {
        ranges.into_iter().any(|range| self.is_in_range(range))
    }

    /// Returns a copy with identifying bits cleared.
    ///
    /// IPv4 (and IPv4 embedded in IPv6) zero the last `byte_count` bytes, at
    /// most four. Other IPv6 addresses keep a /128, /64, /48 or /40 prefix for
    /// `byte_count` 0 to 3; larger counts behave like 3. `::1` takes the IPv6
    /// path, so `byte_count` 1 turns it into `::`.
    pub fn anonymize(&self, byte_count: usize) -> Self {
        match *self {
            IpAddress::V4(mut bytes) => {
                zero_trailing(&mut bytes, byte_count);
                IpAddress::V4(bytes)
            }
            IpAddress::V6(mut bytes) if has_ipv4_prefix(&bytes) => {
                zero_trailing(&mut bytes, byte_count.min(IPV4_LEN));
                IpAddress::V6(bytes)
            }
            IpAddress::V6(mut bytes) => {
                let index = byte_count.min(IPV6_ANONYMIZE_PREFIXES.len() - 1);
                let mask = range::netmask(IPV6_LEN, IPV6_ANONYMIZE_PREFIXES[index]);
                bytes.iter_mut().zip(mask).for_each(|(byte, m)| *byte &= m);
                IpAddress::V6(bytes)
            }
        }
    }
}

impl Default for IpAddress {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

impl FromStr for IpAddress {
    type Err = AddressError;

    /// Accepts surrounding whitespace, `[v6]` brackets and zero-padded octets
    /// such as `010.000.000.001`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let unbracketed = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        if let Ok(ip_addr) = unbracketed.parse::<IpAddr>() {
            return Ok(Self::from(ip_addr));
        }

        parse_padded_ipv4(unbracketed)
            .map(IpAddress::V4)
            .ok_or_else(|| AddressError::Invalid(trimmed.to_string()))
    }
}

impl TryFrom<&[u8]> for IpAddress {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if let Ok(v4) = <[u8; IPV4_LEN]>::try_from(bytes) {
            return Ok(IpAddress::V4(v4));
        }
        if let Ok(v6) = <[u8; IPV6_LEN]>::try_from(bytes) {
            return Ok(IpAddress::V6(v6));
        }
        Err(AddressError::BadLength(bytes.len()))
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(bytes) => fmt::Display::fmt(&Ipv4Addr::from(*bytes), f),
            IpAddress::V6(bytes) => fmt::Display::fmt(&Ipv6Addr::from(*bytes), f),
        }
    }
}

impl From<IpAddr> for IpAddress {
    fn from(ip_addr: IpAddr) -> Self {
        match ip_addr {
            IpAddr::V4(ipv4) => IpAddress::V4(ipv4.octets()),
            IpAddr::V6(ipv6) => IpAddress::V6(ipv6.octets()),
        }
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(ipv4: Ipv4Addr) -> Self {
        IpAddress::V4(ipv4.octets())
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(ipv6: Ipv6Addr) -> Self {
        IpAddress::V6(ipv6.octets())
    }
}

impl From<IpAddress> for IpAddr {
    fn from(addr: IpAddress) -> Self {
        match addr {
            IpAddress::V4(bytes) => IpAddr::V4(Ipv4Addr::from(bytes)),
            IpAddress::V6(bytes) => IpAddr::V6(Ipv6Addr::from(bytes)),
        }
    }
}

/// `::ffff:a.b.c.d`, or `::a.b.c.d` except for `::` and `::1`.
fn has_ipv4_prefix(bytes: &[u8; IPV6_LEN]) -> bool {
    if bytes[..10].iter().any(|&b| b != 0) {
        return false;
    }
    let tail = u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
    match bytes[10..12] {
        [0xff, 0xff] => true,
        [0, 0] => tail > 1,
        _ => false,
    }
}

fn zero_trailing(bytes: &mut [u8], count: usize) {
    let start = bytes.len() - count.min(bytes.len());
    bytes[start..].fill(0);
}

/// Dotted quad where octets may carry leading zeros (read as decimal).
fn parse_padded_ipv4(s: &str) -> Option<[u8; IPV4_LEN]> {
    let mut octets = [0u8; IPV4_LEN];
    let mut parts = s.split('.');

    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse::<u8>().ok()?;
    }

    parts.next().is_none().then_some(octets)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
