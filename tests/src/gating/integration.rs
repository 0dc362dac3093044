#![cfg(test)]
use ipgate_common::network::address::IpAddress;
use ipgate_common::network::allowlist::{self, AllowList};
use ipgate_common::network::lookup::StaticReverseLookup;
use ipgate_core::resolver::RemoteAddressResolver;

const NETWORK_SETTINGS: &str = "\
# REST API access
203.0.113.0/24      # office uplink
2001:db8:42::/48    // v6 office
192.0.2.10-192.0.2.1
300.1.1.1
";

fn proxy_dns() -> StaticReverseLookup {
    StaticReverseLookup::new()
        .with("203.0.113.5", "gw1.office.example.net")
        .with("198.51.100.9", "cache.isp.example.net")
}

/// A request that came through a known proxy is gated on the forwarded address.
#[tokio::test]
async fn forwarded_client_is_allowed() -> anyhow::Result<()> {
    let allow_list = AllowList::parse(NETWORK_SETTINGS);
    let resolver = RemoteAddressResolver::new(Box::new(proxy_dns()));

    let client = resolver
        .resolve(Some("10.9.9.9, 203.0.113.5"), Some("172.16.0.1"))
        .await;

    assert_eq!(client, "203.0.113.5");
    assert!(allow_list.contains_text(&client));
    Ok(())
}

#[tokio::test]
async fn unresolvable_chain_is_gated_on_remote_addr() -> anyhow::Result<()> {
    let allow_list = AllowList::parse(NETWORK_SETTINGS);
    let resolver = RemoteAddressResolver::new(Box::new(StaticReverseLookup::new()));

    let client = resolver
        .resolve(Some("203.0.113.5"), Some("172.16.0.1"))
        .await;

    assert_eq!(client, "172.16.0.1");
    assert!(!allow_list.contains_text(&client));
    Ok(())
}

#[tokio::test]
async fn ipv6_remote_addr_is_allowed() -> anyhow::Result<()> {
    let allow_list = AllowList::parse(NETWORK_SETTINGS);
    let resolver = RemoteAddressResolver::new(Box::new(proxy_dns()));

    let client = resolver.resolve(None, Some("2001:db8:42:1::20")).await;
    assert!(allow_list.contains_text(&client));

    let mapped = IpAddress::from_string("::ffff:203.0.113.9");
    assert!(!allow_list.contains(&mapped));
    let unmapped = IpAddress::from_string(&mapped.to_ipv4_text().unwrap_or_default());
    assert!(allow_list.contains(&unmapped));
    Ok(())
}

#[test]
fn sanitized_settings_keep_their_meaning() {
    let sanitized = allowlist::sanitize_allowlist(NETWORK_SETTINGS);
    assert_eq!(
        sanitized,
        "203.0.113.0/24 # office uplink\n2001:db8:42::/48 # v6 office\n192.0.2.1-192.0.2.10\n"
    );

    let original = AllowList::parse(NETWORK_SETTINGS);
    let reparsed = AllowList::parse(&sanitized);
    assert_eq!(original, reparsed);

    for probe in ["203.0.113.77", "192.0.2.5", "192.0.2.11", "2001:db8:43::1"] {
        assert_eq!(original.contains_text(probe), reparsed.contains_text(probe));
    }
}

#[test]
fn anonymized_addresses_stay_in_their_network() {
    let allow_list = AllowList::parse(NETWORK_SETTINGS);

    let v4 = IpAddress::from_string("203.0.113.200");
    assert!(allow_list.contains(&v4.anonymize(1)));
    assert!(!allow_list.contains(&v4.anonymize(2)));

    let v6 = IpAddress::from_string("2001:db8:42:7:1:2:3:4");
    assert!(allow_list.contains(&v6.anonymize(2)));
    assert!(!allow_list.contains(&v6.anonymize(3)));
}
