//! One-shot site build.

use anyhow::Result;
use vintner_site::{BindPolicy, BuildConfig, Builder};

/// Run one build pass over the conventional directories.
pub fn run(lenient: bool) -> Result<()> {
    let config = BuildConfig {
        policy: if lenient {
            BindPolicy::Lenient
        } else {
            BindPolicy::Strict
        },
        ..BuildConfig::default()
    };

    let report = Builder::new(config).build()?;

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
    if !report.failures.is_empty() {
        anyhow::bail!("{} pages failed to render", report.failures.len());
    }

    Ok(())
}
