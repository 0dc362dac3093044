mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, anonymize, check, info, resolve, sanitize};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet, commands.verbose)?;

    let cfg = commands.to_config();

    match commands.command {
        Commands::Info { addr } => {
            print::header("address information", cfg.quiet);
            info::info(&addr, &cfg).await
        }
        Commands::Check { addr, ranges, file } => {
            print::header("range check", cfg.quiet);
            check::check(&addr, &ranges, file.as_deref(), &cfg)
        }
        Commands::Sanitize { file } => {
            print::header("sanitized allow-list", cfg.quiet);
            sanitize::sanitize(file.as_deref(), &cfg)
        }
        Commands::Anonymize { addr, bytes } => {
            print::header("anonymized address", cfg.quiet);
            anonymize::anonymize(&addr, bytes)
        }
        Commands::Resolve {
            forwarded_for,
            remote,
        } => {
            print::header("client address", cfg.quiet);
            resolve::resolve(forwarded_for.as_deref(), remote.as_deref(), &cfg).await
        }
    }
}
