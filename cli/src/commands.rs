pub mod anonymize;
pub mod check;
pub mod info;
pub mod resolve;
pub mod sanitize;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use ipgate_common::config::{Config, DEFAULT_DNS_TIMEOUT};

#[derive(Parser)]
#[command(name = "ipgate")]
#[command(about = "Address, range and forwarded-for toolkit for allow-list gating.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Never perform reverse DNS lookups
    #[arg(long, global = true)]
    pub no_dns: bool,

    /// Upper bound for a single reverse lookup, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_DNS_TIMEOUT.as_millis() as u64)]
    pub dns_timeout_ms: u64,

    /// Only look up this many forwarded-for entries, counted from the right
    #[arg(long, global = true)]
    pub max_hops: Option<usize>,

    /// Less output (repeat for even less)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show what is known about an address
    #[command(alias = "i")]
    Info { addr: String },
    /// Test whether an address falls inside any of the given ranges
    #[command(alias = "c")]
    Check {
        addr: String,
        /// Range in CIDR, low-high or single host notation
        #[arg(short, long = "range")]
        ranges: Vec<String>,
        /// Allow-list file, one range per line
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print an allow-list in canonical form, dropping invalid lines
    #[command(alias = "s")]
    Sanitize {
        /// Reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Clear the trailing part of an address
    #[command(alias = "a")]
    Anonymize {
        addr: String,
        #[arg(short, long, default_value_t = 1)]
        bytes: usize,
    },
    /// Pick the client address from an X-Forwarded-For header
    #[command(alias = "r")]
    Resolve {
        #[arg(long)]
        forwarded_for: Option<String>,
        /// Address of the directly connected peer
        #[arg(long)]
        remote: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            no_dns: self.no_dns,
            dns_timeout: Duration::from_millis(self.dns_timeout_ms),
            max_forwarded_hops: self.max_hops,
            quiet: self.quiet,
        }
    }
}
