//! The nvgdb router host.
//!
//! A front-end spawns this binary and speaks the framed host protocol over its
//! stdin/stdout. Neovim cannot load it as a remote plugin without an adapter.
//! Logs go to stderr so they never mix with protocol traffic.

#![cfg_attr(test, allow(unused_crate_dependencies))]

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use log::{LevelFilter, info};
use nvgdb_router::host::{HostServer, StdioTransport};
use simple_logger::SimpleLogger;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Opt {
    /// Maximum level of the log messages written to stderr.
    #[arg(long, env = "NVGDB_LOG", default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Opt::parse();

    SimpleLogger::new()
        .with_level(args.log_level)
        .init()
        .wrap_err("failed to install the logger")?;

    info!("Starting nvgdb host");
    let mut server = HostServer::new(StdioTransport::stdio());
    server.run().wrap_err("host server failed")?;
    info!("nvgdb host stopped");

    Ok(())
}
