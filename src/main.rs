mod cli;
mod config;
mod error;
mod logging;
mod phone;
mod script;
mod session;
mod utils;

use clap::Parser;

use crate::cli::{Args, run};

#[tokio::main]
async fn main() {
    logging::init_logging();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
