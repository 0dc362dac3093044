use colored::*;
use ipgate_common::network::address::IpAddress;
use ipgate_common::network::range::IpRange;
use std::net::Ipv6Addr;

use crate::terminal::colors;

pub fn address_type_str(addr: &IpAddress) -> &'static str {
    match addr {
        IpAddress::V4(_) => "IPv4",
        IpAddress::V6(_) if addr.is_ipv4_embedded() => "IPv4 in IPv6",
        IpAddress::V6(bytes) => ipv6_to_type_str(&Ipv6Addr::from(*bytes)),
    }
}

pub fn ipv6_to_type_str(ipv6_addr: &Ipv6Addr) -> &'static str {
    if is_global_unicast(ipv6_addr) {
        return "GUA";
    }
    if ipv6_addr.is_unique_local() {
        return "ULA";
    }
    if ipv6_addr.is_unicast_link_local() {
        return "LLA";
    }
    if ipv6_addr.is_loopback() {
        return "Loopback";
    }
    "IPv6"
}

fn is_global_unicast(ipv6_addr: &Ipv6Addr) -> bool {
    let first_byte = ipv6_addr.octets()[0];
    (0x20..=0x3F).contains(&first_byte)
}

pub fn colored_addr(addr: &IpAddress) -> ColoredString {
    let color = if addr.is_ipv4() { colors::IPV4_ADDR } else { colors::IPV6_ADDR };
    addr.to_text().color(color)
}

pub fn colored_range(range: &IpRange) -> ColoredString {
    range.to_string().color(colors::RANGE)
}

pub fn hex_bytes(addr: &IpAddress) -> String {
    addr.as_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
