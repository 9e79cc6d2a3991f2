//! Serving and change detection for vintner sites.
//!
//! Three pieces compose the `develop` experience: a quiet local file server
//! over the output tree, a polling change watcher over the source
//! directories, and the loop that drives build, serve and watch phases.

pub mod dev;
pub mod server;
pub mod watcher;

pub use dev::{DevConfig, DevError};
pub use server::{ServerError, ServerHandle};
pub use watcher::{WatchOutcome, WatchSnapshot, DEFAULT_POLL_INTERVAL};
