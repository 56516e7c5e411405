use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::error;

use portal_walker::config::{DEFAULT_BASE_URL, DemoAccount};
use portal_walker::{
    ConsoleHandler, PortalConfig, PortalWalker, PortalWalkerError, render_summary,
};

#[derive(Parser, Debug)]
#[command(name = "portal-walker", version, about = "Walk the registration portal's challenge protocol up to its crypto boundary")]
struct Args {
    /// Portal host to walk
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, default_value = "testuser")]
    username: String,

    #[arg(long, default_value = "test@test.com")]
    email: String,

    #[arg(long, default_value = "test123")]
    password: String,

    /// Timeout for init and device check requests, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Timeout for trace and heartbeat requests, in seconds
    #[arg(long, default_value_t = 5)]
    probe_timeout_secs: u64,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, PortalWalkerError> {
    let config = PortalConfig::builder()
        .with_base_url(args.base_url)
        .with_account(DemoAccount {
            username: args.username,
            email: args.email,
            password: args.password,
        })
        .with_request_timeout(Duration::from_secs(args.timeout_secs))
        .with_probe_timeout(Duration::from_secs(args.probe_timeout_secs))
        .build()?;

    let mut builder = PortalWalker::builder().with_config(config);
    if !args.quiet {
        builder = builder.with_event_handler(Arc::new(ConsoleHandler));
    }
    let walker = builder.build()?;

    let walk = walker.run().await;
    println!("{}", render_summary(&walk.report, walker.config()));

    // Stopping at the crypto boundary means every reachable step succeeded.
    if walk.report.reached_crypto_boundary() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}
