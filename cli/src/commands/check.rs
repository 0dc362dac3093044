use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::*;
use ipgate_common::{
    config::Config,
    network::{address::IpAddress, allowlist::AllowList, range},
};
use tracing::{info, warn};

use crate::terminal::{colors, format, print};

pub fn check(
    addr: &str,
    ranges: &[String],
    file: Option<&Path>,
    cfg: &Config,
) -> anyhow::Result<ExitCode> {
    let mut allow_list: AllowList = match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading allow-list {}", path.display()))?;
            AllowList::parse(&text)
        }
        None => AllowList::new(),
    };

    for text in ranges {
        match range::parse_range(text) {
            Some(range) => allow_list.push(range),
            None => warn!("Ignoring invalid range '{text}'"),
        }
    }

    if allow_list.is_empty() {
        anyhow::bail!("no valid ranges given, use --range or --file");
    }

    let Ok(ip) = addr.parse::<IpAddress>() else {
        warn!("'{addr}' is not an IP address, treating it as no match");
        return Ok(ExitCode::FAILURE);
    };

    let matched = allow_list.entries().iter().find(|entry| entry.range.contains(&ip));

    match matched {
        Some(entry) => {
            print::aligned_line("Address", format::colored_addr(&ip));
            print::aligned_line("Matched", format::colored_range(&entry.range));
            if let Some(comment) = &entry.comment {
                print::aligned_line("Comment", comment.as_str());
            }
            print::aligned_line("Result", "allowed".color(colors::MATCH).bold());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            print::aligned_line("Address", format::colored_addr(&ip));
            print::aligned_line("Result", "not allowed".color(colors::NO_MATCH).bold());
            if cfg.quiet == 0 {
                let unit = if allow_list.len() == 1 { "range" } else { "ranges" };
                info!("Checked against {} {unit}", allow_list.len());
            }
            if !allow_list.ranges().any(|range| range.is_ipv4() == ip.is_ipv4()) {
                let family = if ip.is_ipv4() { "IPv4" } else { "IPv6" };
                warn!("No {family} ranges configured, {addr} cannot match");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
