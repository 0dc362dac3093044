#![cfg(test)]
use std::net::Ipv4Addr;

use ipgate_common::network::address::IpAddress;
use ipgate_common::network::range::{self, IpRange};

/// Deterministic pseudo random u32 stream (numerical recipes LCG).
fn samples(seed: u32, count: usize) -> impl Iterator<Item = u32> {
    (0..count).scan(seed, |state, _| {
        *state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        Some(*state)
    })
}

#[test]
fn ipv4_text_roundtrip() {
    for value in samples(7, 500) {
        let std_addr = Ipv4Addr::from(value);
        let text = std_addr.to_string();
        assert_eq!(IpAddress::from_string(&text).to_text(), text);

        let padded = std_addr
            .octets()
            .iter()
            .map(|octet| format!("{octet:03}"))
            .collect::<Vec<_>>()
            .join(".");
        assert_eq!(IpAddress::from_string(&padded).to_text(), text);
    }
}

#[test]
fn cidr_bounds_match_host_bits() {
    for (value, prefix) in samples(11, 300).zip(samples(13, 300).map(|p| (p % 33) as u8)) {
        let text = format!("{}/{prefix}", Ipv4Addr::from(value));
        let range: IpRange = range::parse_range(&text).expect("valid cidr");

        let host_bits: u32 = u32::MAX.checked_shr(u32::from(prefix)).unwrap_or(0);
        assert_eq!(range.low().as_bytes(), (value & !host_bits).to_be_bytes());
        assert_eq!(range.high().as_bytes(), (value | host_bits).to_be_bytes());
        assert!(range.low().as_bytes() <= range.high().as_bytes());
    }
}

#[test]
fn membership_is_unsigned_bytewise_comparison() {
    let bounds: Vec<(u32, u32)> = samples(17, 50)
        .zip(samples(19, 50))
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();

    for (low, high) in bounds {
        let range = IpRange::from_binary_bounds(&low.to_be_bytes(), &high.to_be_bytes())
            .expect("same length bounds");

        for probe in samples(low, 40).chain([low, high, low.wrapping_sub(1), high.wrapping_add(1)]) {
            let addr = IpAddress::from_binary(&probe.to_be_bytes());
            assert_eq!(addr.is_in_range(&range), low <= probe && probe <= high);

            let mut mapped = [0u8; 16];
            mapped[10] = 0xff;
            mapped[11] = 0xff;
            mapped[12..].copy_from_slice(&probe.to_be_bytes());
            assert!(!IpAddress::from_binary(&mapped).is_in_range(&range));
        }
    }
}

#[test]
fn documented_examples() {
    let v4 = IpAddress::from_string("198.51.100.23");
    assert_eq!(v4.anonymize(4).to_text(), "0.0.0.0");
    assert_eq!(v4.anonymize(0), v4);

    assert_eq!(
        IpAddress::from_string("::ffff:192.0.2.1").to_ipv4_text().as_deref(),
        Some("192.0.2.1")
    );
    assert_eq!(IpAddress::from_string("2001:db8::1").to_ipv4_text(), None);

    assert_eq!(
        range::parse_range("10.0.0.5-10.0.0.2"),
        range::parse_range("10.0.0.2-10.0.0.5")
    );
    assert!(range::parse_range("not-an-ip").is_none());
    assert!(range::parse_range("10.0.0.1/99").is_none());
}
