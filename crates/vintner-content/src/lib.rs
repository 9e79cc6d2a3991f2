//! Content loading for vintner sites.
//!
//! Reads a flat directory of markdown files, splits each file into its
//! leading metadata block and body, and renders the body to an HTML
//! fragment. The `title` metadata key becomes the item's identifier, which
//! later names both its template and its output page.

pub mod loader;
pub mod markdown;
pub mod metadata;

pub use loader::{load_dir, ContentError, ContentItem, CONTENT_EXTENSION, TITLE_KEY};
pub use markdown::render_markdown;
pub use metadata::{extract_metadata, Metadata, MetadataError};
