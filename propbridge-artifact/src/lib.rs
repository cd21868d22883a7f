//! # propbridge-artifact
//!
//! Encoding and file lifecycle for the engine's configuration artifact.
//!
//! Call [`serialize`] to render a config and request, [`allocate`] to reserve
//! a location, then [`write`] the text there. [`remove`] cleans up.

pub mod error;
pub mod format;
pub mod location;
pub mod writer;

pub use error::ArtifactError;
pub use format::{digest, parse, serialize};
pub use location::{allocate, remove_run_dir, ArtifactSlot, ARTIFACT_FILE_NAME};
pub use writer::{remove, write, WriteResult};
