//! The develop loop: build, serve, watch, repeat.
//!
//! One pass through the loop builds the site, starts the file server and
//! polls the source directories. A detected change stops the server and
//! re-enters the build phase; an interrupt is the only normal exit. A fatal
//! build error halts the loop. A server fault is fatal to the serving phase
//! only: the loop keeps watching and retries serving after the next change.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use vintner_site::{BuildConfig, BuildError, BuildReport, Builder};

use crate::server;
use crate::watcher::{watch, WatchError, WatchOutcome, WatchSnapshot, DEFAULT_POLL_INTERVAL};

/// Default port for the local file server.
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration for the develop loop.
#[derive(Debug, Clone)]
pub struct DevConfig {
    pub build: BuildConfig,
    pub port: u16,
    pub poll_interval: Duration,
    pub open_browser: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            port: DEFAULT_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            open_browser: true,
        }
    }
}

/// Errors that halt the develop loop.
#[derive(Debug, thiserror::Error)]
pub enum DevError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Watch(#[from] WatchError),
}

/// Run the develop loop until interrupted.
pub async fn run(config: DevConfig) -> Result<(), DevError> {
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), config.port);
    let builder = Builder::new(config.build.clone());

    // Owned by the loop, never process-global: the tab opens once per
    // process and stays closed on rebuild restarts.
    let mut browser_opened = false;

    loop {
        // Building. Once started, a build runs to completion or fatal
        // error; nothing cancels it midway.
        let report = builder.build()?;
        report_outcome(&report);

        // Serving.
        let server = match server::start(addr, config.build.output_dir.clone()).await {
            Ok(handle) => {
                tracing::info!("serving at http://{addr}/");
                if config.open_browser && !browser_opened {
                    if let Err(err) = open::that(format!("http://{addr}/")) {
                        tracing::warn!("could not open a browser tab: {err}");
                    }
                }
                browser_opened = true;
                Some(handle)
            }
            Err(err) => {
                tracing::error!("server unavailable, still watching for changes: {err}");
                None
            }
        };

        // Watching.
        let snapshot = WatchSnapshot::capture(&[
            config.build.content_dir.as_path(),
            config.build.template_dir.as_path(),
            config.build.static_dir.as_path(),
        ])?;

        let outcome = watch(&snapshot, config.poll_interval, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

        // The loop, not the server, decides when serving stops: release
        // the port before the next build or the final exit.
        if let Some(handle) = server {
            if let Err(err) = handle.shutdown().await {
                tracing::warn!("server shutdown: {err}");
            }
        }

        match outcome {
            WatchOutcome::ChangeDetected => {
                tracing::info!("rebuilding; refresh the page to see changes");
            }
            WatchOutcome::Cancelled => {
                tracing::info!("interrupted, shutting down");
                return Ok(());
            }
        }
    }
}

fn report_outcome(report: &BuildReport) {
    tracing::info!(
        "built {} pages and copied {} assets in {}ms",
        report.pages,
        report.assets,
        report.duration_ms
    );
    if report.skipped > 0 {
        tracing::warn!("{} content items were skipped", report.skipped);
    }
    for failure in &report.failures {
        tracing::error!(
            "page `{}` failed to render: {}",
            failure.identifier,
            failure.message
        );
    }
}
