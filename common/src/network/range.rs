//! # IP Range Model
//!
//! A continuous, inclusive range of addresses of a single family.
//!
//! Three notations are understood, as typed into allow-list settings:
//! * A single host (e.g., `192.0.2.7`, `2001:db8::1`).
//! * An explicit range in either order (e.g., `10.0.0.2-10.0.0.5`).
//! * A CIDR block (e.g., `192.168.1.0/24`, `2001:db8::/32`).

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::RangeError;
use crate::network::address::IpAddress;

/// Represents an inclusive range `low..=high`; both bounds share a family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IpRange {
    low: IpAddress,
    high: IpAddress,
}

impl IpRange {
    pub fn single(addr: IpAddress) -> Self {
        Self {
            low: addr,
            high: addr,
        }
    }

    /// Builds a range from two addresses given in any order.
    ///
    /// Returns `None` when the bounds are of different families.
    pub fn from_bounds(a: IpAddress, b: IpAddress) -> Option<Self> {
        ordered(a, b).ok()
    }

    /// Same as [`IpRange::from_bounds`] for raw byte bounds.
    pub fn from_binary_bounds(low: &[u8], high: &[u8]) -> Option<Self> {
        let low = IpAddress::try_from(low).ok()?;
        let high = IpAddress::try_from(high).ok()?;
        Self::from_bounds(low, high)
    }

    /// Creates the range covering the network block `addr/prefix`.
    pub fn cidr(addr: IpAddress, prefix: u8) -> Result<Self, RangeError> {
        let max = max_prefix(&addr);
        if prefix > max {
            return Err(RangeError::Prefix {
                prefix: prefix.to_string(),
                max,
            });
        }

        let mask = netmask(addr.byte_len(), prefix);
        let low: Vec<u8> = addr.as_bytes().iter().zip(&mask).map(|(b, m)| b & m).collect();
        let high: Vec<u8> = low.iter().zip(&mask).map(|(b, m)| b | !m).collect();

        Ok(Self {
            low: IpAddress::from_binary(&low),
            high: IpAddress::from_binary(&high),
        })
    }

    pub fn low(&self) -> &IpAddress {
        &self.low
    }

    pub fn high(&self) -> &IpAddress {
        &self.high
    }

    pub fn is_ipv4(&self) -> bool {
        self.low.is_ipv4()
    }

    pub fn contains(&self, addr: &IpAddress) -> bool {
        addr.is_in_range(self)
    }

    /// Number of addresses covered, saturating at `u128::MAX` for `::/0`.
    pub fn address_count(&self) -> u128 {
        let low = to_u128(self.low.as_bytes());
        let high = to_u128(self.high.as_bytes());
        (high - low).saturating_add(1)
    }

    /// The prefix length if this range is exactly one CIDR block.
    pub fn prefix_len(&self) -> Option<u8> {
        let low = self.low.as_bytes();
        let high = self.high.as_bytes();

        let mut prefix: usize = 0;
        for (l, h) in low.iter().zip(high) {
            let diff = l ^ h;
            prefix += diff.leading_zeros() as usize;
            if diff != 0 {
                break;
            }
        }

        let prefix = u8::try_from(prefix).ok()?;
        let mask = netmask(low.len(), prefix);
        let aligned = low
            .iter()
            .zip(high)
            .zip(&mask)
            .all(|((l, h), m)| l & !m == 0 && *h == l | !m);

        aligned.then_some(prefix)
    }
}

impl FromStr for IpRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(RangeError::Empty);
        }

        if let Some((host, prefix)) = text.split_once('/') {
            return parse_cidr(host, prefix);
        }

        if let Some((start, end)) = text.split_once('-') {
            let start = start.parse::<IpAddress>()?;
            let end = end.parse::<IpAddress>()?;
            return ordered(start, end);
        }

        Ok(Self::single(text.parse()?))
    }
}

impl fmt::Display for IpRange {
    /// Canonical form: `addr`, `network/prefix` or `low-high`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            return write!(f, "{}", self.low);
        }
        match self.prefix_len() {
            Some(prefix) => write!(f, "{}/{}", self.low, prefix),
            None => write!(f, "{}-{}", self.low, self.high),
        }
    }
}

/// Parses CIDR, `low-high` or single host notation.
///
/// Malformed text yields `None`; callers drop such entries.
pub fn parse_range(text: &str) -> Option<IpRange> {
    text.parse::<IpRange>()
        .inspect_err(|err| debug!("Dropping range '{}': {err}", text.trim()))
        .ok()
}

/// Re-renders a range in canonical form for storage, `None` if unparsable.
pub fn sanitize_range_text(text: &str) -> Option<String> {
    parse_range(text).map(|range| range.to_string())
}

/// Byte-wise network mask of `len` bytes with the first `prefix` bits set.
pub(crate) fn netmask(len: usize, prefix: u8) -> Vec<u8> {
    let prefix = usize::from(prefix).min(len * 8);
    let full_bytes = prefix / 8;
    let rem_bits = prefix % 8;

    let mut mask = vec![0u8; len];
    mask[..full_bytes].fill(0xFF);
    if rem_bits != 0 {
        mask[full_bytes] = 0xFF << (8 - rem_bits);
    }
    mask
}

fn parse_cidr(host: &str, prefix_str: &str) -> Result<IpRange, RangeError> {
    let addr = host.parse::<IpAddress>()?;
    let max = max_prefix(&addr);

    let prefix_str = prefix_str.trim();
    let prefix = prefix_str
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| prefix_str.parse::<u8>().ok())
        .flatten()
        .filter(|prefix| *prefix <= max)
        .ok_or_else(|| RangeError::Prefix {
            prefix: prefix_str.to_string(),
            max,
        })?;

    IpRange::cidr(addr, prefix)
}

fn ordered(a: IpAddress, b: IpAddress) -> Result<IpRange, RangeError> {
    if a.byte_len() != b.byte_len() {
        return Err(RangeError::FamilyMismatch {
            low: a.to_text(),
            high: b.to_text(),
        });
    }

    let (low, high) = if a.as_bytes() <= b.as_bytes() { (a, b) } else { (b, a) };
    Ok(IpRange { low, high })
}

fn max_prefix(addr: &IpAddress) -> u8 {
    (addr.byte_len() * 8) as u8
}

fn to_u128(bytes: &[u8]) -> u128 {
    bytes.iter().fold(0u128, |acc, b| (acc << 8) | u128::from(*b))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> IpAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_netmask() {
        assert_eq!(netmask(4, 0), vec![0, 0, 0, 0]);
        assert_eq!(netmask(4, 20), vec![0xFF, 0xFF, 0xF0, 0]);
        assert_eq!(netmask(4, 32), vec![0xFF; 4]);
        assert_eq!(netmask(16, 40)[..6], [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0]);
        assert_eq!(netmask(16, 128), vec![0xFF; 16]);
    }

    #[test]
    fn test_cidr_range() {
        let range = parse_range("192.168.1.100/24").unwrap();
        assert_eq!(range.low(), &addr("192.168.1.0"));
        assert_eq!(range.high(), &addr("192.168.1.255"));
    }

    #[test]
    fn test_cidr_range_odd_prefix() {
        let range = parse_range("172.16.5.10/20").unwrap();
        assert_eq!(range.low(), &addr("172.16.0.0"));
        assert_eq!(range.high(), &addr("172.16.15.255"));
    }

    #[test]
    fn test_cidr_range_every_ipv4_prefix() {
        let ip = addr("203.0.113.77");
        let ip_u32 = u32::from_be_bytes([203, 0, 113, 77]);

        for prefix in 0..=32u8 {
            let range = parse_range(&format!("203.0.113.77/{prefix}")).unwrap();
            let mask: u32 = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };

            assert_eq!(range.low().byte_len(), 4);
            assert_eq!(range.high().byte_len(), 4);
            assert!(range.low().as_bytes() <= range.high().as_bytes());
            assert_eq!(range.low().as_bytes(), (ip_u32 & mask).to_be_bytes());
            assert_eq!(range.high().as_bytes(), (ip_u32 | !mask).to_be_bytes());
            assert!(range.contains(&ip));
        }
    }

    #[test]
    fn test_cidr_range_ipv6() {
        let range = parse_range("2001:db8:abcd::1/48").unwrap();
        assert_eq!(range.low(), &addr("2001:db8:abcd::"));
        assert_eq!(range.high(), &addr("2001:db8:abcd:ffff:ffff:ffff:ffff:ffff"));

        assert!(!range.is_ipv4());
        assert!(parse_range("192.0.2.0/24").unwrap().is_ipv4());

        let all = parse_range("::/0").unwrap();
        assert_eq!(all.address_count(), u128::MAX);
        assert!(parse_range("2001:db8::/128").is_some());
    }

    #[test]
    fn test_cidr_range_invalid_prefix() {
        assert!(parse_range("10.0.0.1/99").is_none());
        assert!(parse_range("10.0.0.1/33").is_none());
        assert!(parse_range("2001:db8::/129").is_none());
        assert!(parse_range("10.0.0.1/").is_none());
        assert!(parse_range("10.0.0.1/-1").is_none());
        assert!(parse_range("10.0.0.1/+8").is_none());
        assert!(parse_range("999.1.2.3/24").is_none());

        assert_eq!(
            "10.0.0.1/33".parse::<IpRange>(),
            Err(RangeError::Prefix {
                prefix: "33".to_string(),
                max: 32
            })
        );
    }

    #[test]
    fn test_explicit_range_order_independent() {
        let forward = parse_range("10.0.0.2-10.0.0.5").unwrap();
        let backward = parse_range("10.0.0.5-10.0.0.2").unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.low(), &addr("10.0.0.2"));
        assert_eq!(forward.high(), &addr("10.0.0.5"));
        assert_eq!(forward.address_count(), 4);
    }

    #[test]
    fn test_explicit_range_invalid() {
        assert!(parse_range("not-an-ip").is_none());
        assert!(parse_range("10.0.0.1-").is_none());
        assert!(parse_range("10.0.0.1-50").is_none());
        assert!(parse_range("10.0.0.1-::1").is_none());
        assert!(matches!(
            "10.0.0.1-::1".parse::<IpRange>(),
            Err(RangeError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn test_single_host() {
        let range = parse_range(" 192.0.2.7 ").unwrap();
        assert_eq!(range.low(), range.high());
        assert_eq!(range.address_count(), 1);
        assert!(parse_range("").is_none());
        assert_eq!("".parse::<IpRange>(), Err(RangeError::Empty));
    }

    #[test]
    fn test_from_bounds() {
        let range = IpRange::from_bounds(addr("10.0.0.9"), addr("10.0.0.1")).unwrap();
        assert_eq!(range.low(), &addr("10.0.0.1"));
        assert!(IpRange::from_bounds(addr("10.0.0.9"), addr("::1")).is_none());

        let range = IpRange::from_binary_bounds(&[10, 0, 0, 0], &[10, 0, 0, 255]).unwrap();
        assert_eq!(range.prefix_len(), Some(24));
        assert!(IpRange::from_binary_bounds(&[10, 0, 0], &[10, 0, 0, 255]).is_none());
    }

    #[test]
    fn test_prefix_len() {
        assert_eq!(parse_range("10.0.0.0/8").unwrap().prefix_len(), Some(8));
        assert_eq!(parse_range("0.0.0.0/0").unwrap().prefix_len(), Some(0));
        assert_eq!(parse_range("10.0.0.1").unwrap().prefix_len(), Some(32));
        assert_eq!(parse_range("10.0.0.1-10.0.0.2").unwrap().prefix_len(), None);
        assert_eq!(parse_range("10.0.0.0-10.0.0.2").unwrap().prefix_len(), None);
        assert_eq!(parse_range("10.0.0.2-10.0.0.3").unwrap().prefix_len(), Some(31));
    }

    #[test]
    fn test_sanitize_range_text() {
        assert_eq!(sanitize_range_text("192.168.1.77/24").as_deref(), Some("192.168.1.0/24"));
        assert_eq!(sanitize_range_text("10.0.0.5-10.0.0.2").as_deref(), Some("10.0.0.2-10.0.0.5"));
        assert_eq!(sanitize_range_text("10.0.0.0-10.0.0.255").as_deref(), Some("10.0.0.0/24"));
        assert_eq!(sanitize_range_text("010.0.0.1").as_deref(), Some("10.0.0.1"));
        assert_eq!(sanitize_range_text("10.0.0.1/32").as_deref(), Some("10.0.0.1"));
        assert_eq!(sanitize_range_text("2001:DB8::1/32").as_deref(), Some("2001:db8::/32"));
        assert_eq!(sanitize_range_text("not-an-ip"), None);
    }
}
