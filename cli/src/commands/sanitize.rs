use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use ipgate_common::{
    config::Config,
    network::allowlist::{self, AllowList},
};
use tracing::info;

use crate::terminal::print;

pub fn sanitize(file: Option<&Path>, cfg: &Config) -> anyhow::Result<ExitCode> {
    let text: String = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading allow-list {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("reading allow-list from stdin")?,
    };

    let allow_list = AllowList::parse(&text);
    for entry in allow_list.entries() {
        print::print(&entry.to_string());
    }

    if cfg.quiet == 0 {
        let candidates: usize = text
            .lines()
            .filter(|line| !allowlist::strip_comment(line).0.is_empty())
            .count();
        let dropped: usize = candidates - allow_list.len();
        info!("{} entries kept, {dropped} dropped", allow_list.len());
    }

    Ok(ExitCode::SUCCESS)
}
