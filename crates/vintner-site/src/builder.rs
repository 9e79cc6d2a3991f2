//! Build orchestration: one complete pass from content to output tree.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use vintner_content::{load_dir, ContentError, ContentItem};

use crate::assets::{self, AssetError};
use crate::templates::{template_name, RenderNamespace, TemplateError, TemplateStore};

/// Conventional source and output directory names.
pub const CONTENT_DIR: &str = "pages";
pub const TEMPLATE_DIR: &str = "template";
pub const STATIC_DIR: &str = "static";
pub const OUTPUT_DIR: &str = "public";

/// What happens when a content item cannot bind: a missing `title`,
/// malformed metadata, or no template named after its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindPolicy {
    /// An item that cannot bind fails the whole build.
    #[default]
    Strict,
    /// Unbindable items are skipped with a warning. A skipped item still
    /// contributes its fragment to the namespace when it has one; it just
    /// produces no page of its own.
    Lenient,
}

/// Configuration for one build pass.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub content_dir: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub output_dir: PathBuf,
    pub policy: BindPolicy,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(CONTENT_DIR),
            template_dir: PathBuf::from(TEMPLATE_DIR),
            static_dir: PathBuf::from(STATIC_DIR),
            output_dir: PathBuf::from(OUTPUT_DIR),
            policy: BindPolicy::default(),
        }
    }
}

/// A page that failed to render. Sibling pages are unaffected.
#[derive(Debug, Clone)]
pub struct RenderFailure {
    pub identifier: String,
    pub message: String,
}

/// Result of one build pass.
#[derive(Debug)]
pub struct BuildReport {
    /// Pages written to the output tree.
    pub pages: usize,
    /// Static files copied.
    pub assets: usize,
    /// Items skipped under the lenient policy.
    pub skipped: usize,
    /// Per-page render failures.
    pub failures: Vec<RenderFailure>,
    /// Total build time in milliseconds.
    pub duration_ms: u64,
}

/// Errors that abort a build.
///
/// A failed build may leave partial output on disk; the output directory is
/// not staged and atomically renamed.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing required directory: {0}")]
    MissingDirectory(PathBuf),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("no template named `{name}` for content item `{identifier}`")]
    TemplateNotFound { identifier: String, name: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

enum PageOutcome {
    Written,
    Failed(RenderFailure),
}

/// Runs one build pass: reset output, copy static assets, load content,
/// bind items to templates and render every bound pair against the shared
/// namespace.
pub struct Builder {
    config: BuildConfig,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        self.check_directories()?;

        assets::reset_output_dir(&self.config.output_dir)?;
        let copied = assets::copy_static(&self.config.static_dir, &self.config.output_dir)?;

        let outcomes = load_dir(&self.config.content_dir)?;
        let templates = TemplateStore::load(&self.config.template_dir)?;
        tracing::debug!("loaded {} templates", templates.len());

        // Pass 1: bind. Collect the items that load, then pair each with its
        // template. Faults follow the bind policy.
        let mut items: Vec<ContentItem> = Vec::new();
        let mut skipped = 0;
        for outcome in outcomes {
            match outcome {
                Ok(item) => items.push(item),
                Err(err) => match self.config.policy {
                    BindPolicy::Strict => return Err(err.into()),
                    BindPolicy::Lenient => {
                        tracing::warn!("skipping content item: {err}");
                        skipped += 1;
                    }
                },
            }
        }

        let mut bound: Vec<(&ContentItem, &str)> = Vec::new();
        for item in &items {
            match templates.resolve(&item.identifier) {
                Some(source) => bound.push((item, source)),
                None => match self.config.policy {
                    BindPolicy::Strict => {
                        return Err(BuildError::TemplateNotFound {
                            identifier: item.identifier.clone(),
                            name: template_name(&item.identifier),
                        });
                    }
                    BindPolicy::Lenient => {
                        tracing::warn!(
                            "no template for `{}`, skipping its page",
                            item.identifier
                        );
                        skipped += 1;
                    }
                },
            }
        }

        // Pass 2: the namespace holds every loaded item's fragment, bound or
        // not, and is complete before the first render. Any template may
        // reference any identifier.
        let mut namespace = RenderNamespace::new();
        for item in &items {
            if namespace
                .insert(item.identifier.clone(), item.fragment.clone())
                .is_some()
            {
                tracing::warn!(
                    "duplicate identifier `{}`; the last content file wins",
                    item.identifier
                );
            }
        }

        let results: Vec<Result<PageOutcome, BuildError>> = bound
            .par_iter()
            .map(|(item, source)| self.render_page(item, source, &templates, &namespace))
            .collect();

        let mut pages = 0;
        let mut failures = Vec::new();
        for result in results {
            match result? {
                PageOutcome::Written => pages += 1,
                PageOutcome::Failed(failure) => failures.push(failure),
            }
        }

        Ok(BuildReport {
            pages,
            assets: copied,
            skipped,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn check_directories(&self) -> Result<(), BuildError> {
        for dir in [
            &self.config.content_dir,
            &self.config.template_dir,
            &self.config.static_dir,
        ] {
            if !dir.is_dir() {
                return Err(BuildError::MissingDirectory(dir.clone()));
            }
        }
        Ok(())
    }

    fn render_page(
        &self,
        item: &ContentItem,
        source: &str,
        templates: &TemplateStore,
        namespace: &RenderNamespace,
    ) -> Result<PageOutcome, BuildError> {
        let html = match templates.render(source, namespace) {
            Ok(html) => html,
            Err(err) => {
                return Ok(PageOutcome::Failed(RenderFailure {
                    identifier: item.identifier.clone(),
                    message: err.to_string(),
                }));
            }
        };

        let path = self
            .config
            .output_dir
            .join(format!("{}.html", item.identifier));
        fs::write(&path, html).map_err(|source| BuildError::Write { path, source })?;

        Ok(PageOutcome::Written)
    }
}
