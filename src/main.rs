//! ipv4ddns - IPv4 DDNS updater for Cloudflare
//!
//! Architecture:
//! - One pass per invocation, triggered by an external scheduler
//! - Public address from an HTTP echo service
//! - Existing A record rewritten only when it differs, never created
//! - Uses reqwest for HTTP (rustls)
//!
//! Every path exits with status 0; failures are logged.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ipv4ddns::cloudflare::CloudflareClient;
use ipv4ddns::config::Config;
use ipv4ddns::public_ip::HttpIpResolver;
use ipv4ddns::updater::Updater;

/// Application version
const VERSION: &str = "1.0.0";

//==============================================================================
// Main
//==============================================================================

#[derive(Debug, Parser)]
#[command(name = "ipv4ddns")]
#[command(version = VERSION)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Parses the command line without letting clap exit the process
///
/// `--help` and `--version` print as usual; bad arguments are logged.
/// Returns `None` when there is nothing to run.
fn parse_args<I, T>(argv: I) -> Option<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Some(args),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            None
        }
        Err(e) => {
            init_logging(false);
            error!("Invalid arguments: {}", e.to_string().trim_end());
            None
        }
    }
}

/// Describes a `.env` load failure worth reporting; a missing file is not one
fn dotenv_warning<T>(result: &dotenvy::Result<T>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!("Ignoring .env file: {}", e)),
        _ => None,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let Some(args) = parse_args(std::env::args_os()) else {
        return;
    };
    let dotenv = dotenvy::dotenv();

    let config = match Config::load(args.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(args.verbose);
            if let Some(msg) = dotenv_warning(&dotenv) {
                warn!("{}", msg);
            }
            error!("Config load failed: {:#}", e);
            return;
        }
    };

    init_logging(args.verbose || config.verbose);
    if let Ok(path) = &dotenv {
        info!("Loaded environment from {}", path.display());
    }
    if let Some(msg) = dotenv_warning(&dotenv) {
        warn!("{}", msg);
    }

    let cf_client = match CloudflareClient::new(config.api_token.as_str(), config.timeout) {
        Ok(client) => client,
        Err(e) => {
            error!("Cloudflare client failed: {:#}", e);
            return;
        }
    };
    let resolver = match HttpIpResolver::new(&config.ip_service, config.timeout) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("IP resolver failed: {:#}", e);
            return;
        }
    };

    let outcome = Updater::new(&config, &cf_client, &resolver).run().await;
    info!("Run finished: {}", outcome);
}

//==============================================================================
// Tests
//==============================================================================
