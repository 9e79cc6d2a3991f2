//! Development loop command.

use std::time::Duration;

use anyhow::Result;
use vintner_server::dev::{self, DevConfig};
use vintner_site::{BindPolicy, BuildConfig};

/// Run the develop loop: build, serve, rebuild on change.
pub async fn run(port: u16, interval_ms: u64, open: bool, lenient: bool) -> Result<()> {
    let config = DevConfig {
        build: BuildConfig {
            policy: if lenient {
                BindPolicy::Lenient
            } else {
                BindPolicy::Strict
            },
            ..BuildConfig::default()
        },
        port,
        poll_interval: Duration::from_millis(interval_ms),
        open_browser: open,
    };

    dev::run(config).await?;

    Ok(())
}
