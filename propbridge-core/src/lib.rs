//! propbridge core library — propagation parameters, settings, errors.
//!
//! Public API surface:
//! - [`config`] — [`PropagationConfig`] and its builder
//! - [`request`] — [`PropagationRequest`]
//! - [`types`] — two-valued switches ([`Perturbations`], [`ArtifactMode`], [`CleanupPolicy`])
//! - [`settings`] — YAML-backed [`BridgeSettings`]
//! - [`epoch`] — Julian date conversions
//! - [`error`] — [`ValidationError`], [`SettingsError`]

pub mod config;
pub mod epoch;
pub mod error;
pub mod request;
pub mod settings;
pub mod types;

pub use config::{PropagationConfig, PropagationConfigBuilder, EARTH_MU, EARTH_RADIUS_KM};
pub use error::{SettingsError, ValidationError};
pub use request::PropagationRequest;
pub use settings::{ArtifactSettings, BridgeSettings};
pub use types::{ArtifactMode, CleanupPolicy, Perturbations};
