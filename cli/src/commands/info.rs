use std::process::ExitCode;

use anyhow::Context;
use colored::*;
use ipgate_common::{config::Config, network::address::IpAddress};
use ipgate_core::dns;

use crate::terminal::{colors, format, print};

pub async fn info(addr: &str, cfg: &Config) -> anyhow::Result<ExitCode> {
    let ip: IpAddress = addr
        .parse()
        .with_context(|| format!("cannot show information for '{addr}'"))?;

    print::aligned_line("Address", format::colored_addr(&ip));
    print::aligned_line("Type", format::address_type_str(&ip));
    print::aligned_line("Bytes", format::hex_bytes(&ip));

    if let Some(ipv4) = ip.to_ipv4_text() {
        print::aligned_line("IPv4", ipv4.color(colors::IPV4_ADDR));
    }

    if !cfg.no_dns {
        let lookup = dns::reverse_lookup(cfg);
        let hostname: ColoredString = match ip.resolve_hostname(lookup.as_ref()).await {
            Some(hostname) => hostname.color(colors::ACCENT),
            None => "no PTR record".color(colors::SEPARATOR),
        };
        print::aligned_line("Hostname", hostname);
    }

    Ok(ExitCode::SUCCESS)
}
