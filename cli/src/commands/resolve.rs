use std::process::ExitCode;

use ipgate_common::config::Config;
use ipgate_core::resolver::RemoteAddressResolver;
use tracing::warn;

use crate::terminal::print;

pub async fn resolve(
    forwarded_for: Option<&str>,
    remote: Option<&str>,
    cfg: &Config,
) -> anyhow::Result<ExitCode> {
    if cfg.no_dns && forwarded_for.is_some() {
        warn!("Reverse DNS is disabled, forwarded-for entries cannot be trusted");
    }

    let resolver = RemoteAddressResolver::from_config(cfg);
    let client: String = resolver.resolve(forwarded_for, remote).await;

    if client.is_empty() {
        warn!("No client address could be determined");
        return Ok(ExitCode::FAILURE);
    }

    print::print(&client);
    Ok(ExitCode::SUCCESS)
}
