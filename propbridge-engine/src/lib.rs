//! Engine invocation and the `propagate` entry point.
//!
//! ```rust,no_run
//! use propbridge_core::{BridgeSettings, PropagationConfig, PropagationRequest};
//! use propbridge_engine::Orchestrator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PropagationConfig::builder([7000.0, 0.0, 0.0], [0.0, 7.5, 0.0], 10.0, 500.0, 2460000.5)
//!     .build()?;
//! let request = PropagationRequest::new(0.0, 3600.0, 60.0, "traj.txt")?;
//! let record = Orchestrator::new(BridgeSettings::default()).propagate(&config, &request)?;
//! println!("artifact kept at {}", record.artifact_path.display());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod invoker;
pub mod logging;
mod orchestrator;
pub mod record;

pub use error::{EngineError, PropagateError};
pub use invoker::{invoke, EngineOutcome};
pub use logging::init_tracing;
pub use orchestrator::Orchestrator;
pub use record::RunRecord;
