//! authsession - terminal client for a token-based authentication service

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod session;

use cli::args::GlobalOptions;
use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts),
        Commands::Login { username, password } => {
            cli::auth::login(&opts, username, password).await
        }
        Commands::Register { username, password } => {
            cli::auth::register(&opts, username, password).await
        }
        Commands::Logout => cli::auth::logout(&opts),
        Commands::Whoami => cli::session::whoami(&opts),
        Commands::Check => cli::session::check(&opts).await,
        Commands::Watch { eager } => cli::session::watch(&opts, eager).await,
        Commands::Health => cli::health::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("authsession version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default_filter = if debug { "authsession=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
