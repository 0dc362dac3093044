use std::process::ExitCode;

use anyhow::Context;
use ipgate_common::network::address::IpAddress;
use tracing::debug;

use crate::terminal::{format, print};

pub fn anonymize(addr: &str, bytes: usize) -> anyhow::Result<ExitCode> {
    let ip: IpAddress = addr
        .parse()
        .with_context(|| format!("cannot anonymize '{addr}'"))?;

    if ip.is_ipv6() && !ip.is_ipv4_embedded() && bytes > 3 {
        debug!("IPv6 anonymization is capped at 3, using 3 instead of {bytes}");
    }

    print::print(&format::colored_addr(&ip.anonymize(bytes)).to_string());
    Ok(ExitCode::SUCCESS)
}
