//! tutor-client binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, warn};
use tutor_client::cli::{self, Args};
use tutor_client::config::Config;
use tutor_client::session::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
use tutor_client::{commands, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::try_init_with(Some(config.log_filter())).ok();

    match run(&args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let api = Arc::new(config.to_api_client()?);

    let identity: Arc<dyn IdentityStore> = match config.identity_path() {
        Some(path) => {
            let store = FileIdentityStore::new(path);
            debug!("Identity file: {}", store.path().display());
            Arc::new(store)
        }
        None => {
            warn!("No config directory; identity will not be persisted");
            Arc::new(MemoryIdentityStore::new())
        }
    };

    let mut stdout = std::io::stdout();
    tokio::select! {
        result = commands::run(args, config, api, identity, &mut stdout) => Ok(result?),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            Err("interrupted".into())
        }
    }
}
