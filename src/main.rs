use clap::Parser;
use relayrouter::cli::{run_cli, Cli};
use relayrouter::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging()?;
    run_cli(cli)
}
