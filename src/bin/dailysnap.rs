//! Dailysnap Photobooth CLI Tool
//!
//! Command-line interface for the dailysnap compositing pipeline: remote
//! background removal, frame merge, and foreground overlay.

#[cfg(feature = "cli")]
use dailysnap::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
