//! Build pipeline for vintner sites.
//!
//! Orchestrates one build pass: prepare the output directory, copy static
//! assets, load content, bind each item to its named template and render
//! every bound template against the shared namespace of rendered fragments.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{
    BindPolicy, BuildConfig, BuildError, BuildReport, Builder, RenderFailure, CONTENT_DIR,
    OUTPUT_DIR, STATIC_DIR, TEMPLATE_DIR,
};
pub use templates::{RenderNamespace, TemplateStore};
