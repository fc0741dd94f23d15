use docfetch_core::logging;

mod cli;

use crate::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The server logs to the terminal; one-shot commands log to the state dir.
    if cli.command.is_foreground_server() {
        logging::init_stderr();
    } else {
        logging::init();
    }

    if let Err(err) = cli.command.run().await {
        eprintln!("docfetch error: {:#}", err);
        std::process::exit(1);
    }
}
