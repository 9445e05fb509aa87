//! TRON Risk CLI - score one wallet from the command line
//!
//! Usage:
//!   tron_risk <address> [--text]
//!
//! Prints the report as JSON, or as the plain-text document with `--text`.
//! Logs go to stderr so stdout stays machine-readable.

use eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;
use tron_risk::utils::address::canonical_address;
use tron_risk::{live_scorer, render_text_report, EngineConfig, ProviderConfig};

struct CliArgs {
    address: String,
    text: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut address = None;
    let mut text = false;

    for arg in args {
        match arg.as_str() {
            "--text" => text = true,
            "-h" | "--help" => return Err(eyre!("usage: tron_risk <address> [--text]")),
            flag if flag.starts_with("--") => return Err(eyre!("unknown option {}", flag)),
            _ if address.is_none() => address = Some(arg),
            _ => return Err(eyre!("unexpected argument {}", arg)),
        }
    }

    Ok(CliArgs {
        address: address.ok_or_else(|| eyre!("usage: tron_risk <address> [--text]"))?,
        text,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let address = canonical_address(&args.address)?;

    let scorer = live_scorer(EngineConfig::from_env(), &ProviderConfig::from_env())?;
    let report = scorer.score_wallet(&address).await;

    if args.text {
        print!("{}", render_text_report(&report));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
