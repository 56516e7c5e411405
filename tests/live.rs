use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use portal_walker::config::DEFAULT_BASE_URL;
use portal_walker::{ConsoleHandler, PortalConfig, PortalWalker, VERSION, render_summary};
use tokio::runtime::Runtime;

fn prompt(label: &str) -> io::Result<String> {
    print!("{} ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[test]
#[ignore = "Requires network access to a running portal and manual input"]
fn live_walk_against_portal() -> Result<(), Box<dyn Error>> {
    println!("portal-walker {} live smoke test", VERSION);

    let url_input = prompt(&format!("Portal URL [{DEFAULT_BASE_URL}]:"))?;
    let base_url = if url_input.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        url_input
    };

    let config = PortalConfig::builder().with_base_url(base_url).build()?;
    let walker = PortalWalker::builder()
        .with_config(config)
        .with_event_handler(Arc::new(ConsoleHandler))
        .build()?;

    let runtime = Runtime::new()?;
    let walk = runtime.block_on(walker.run());
    println!("{}", render_summary(&walk.report, walker.config()));

    // A healthy portal lets every reachable step through.
    assert!(walk.report.reached_crypto_boundary());
    assert_eq!(walk.report.completed(), 8);
    Ok(())
}
