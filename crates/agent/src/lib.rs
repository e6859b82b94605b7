//! # Cirrus Agent
//!
//! The environment reconciler. On every container start it brings the
//! persistent volume to a known-good state (bootstrap, source update, config
//! migration and rewrite, dependency refresh, model downloads) and then hands
//! off to the ComfyUI server as a detached child process.
//!
//! ## Modules
//!
//! - [`reconciler`] - The ordered reconciliation sequence
//! - [`source`] - Git checkout repair and update
//! - [`assets`] - Model fetching from the hub
//! - [`launch`] - Server process handoff
//! - [`error`] - Error types

#![warn(missing_docs)]

/// Module version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod assets;
pub mod error;
pub mod launch;
pub mod reconciler;
pub mod source;

// Re-exports
pub use assets::{HubFetcher, ModelFetcher};
pub use error::{Error, Result};
pub use launch::LaunchSpec;
pub use reconciler::{ReconcileReport, Reconciler};
pub use source::SourceUpdater;
