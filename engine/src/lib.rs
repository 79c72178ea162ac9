//! Subtangle engine: build a locally linked fragment of records anchored to the
//! network frontier, checkpoint it, and publish it in dependency order.
//!
//! - [`builder`] grows the fragment with windowed-random tip selection.
//! - [`publisher`] closes the fragment back onto the frontier and broadcasts it.
//! - [`orchestrator`] decides between resuming a checkpoint and building fresh.

pub mod builder;
pub mod config;
pub mod error;
mod link;
pub mod logging;
pub mod orchestrator;
pub mod progress;
pub mod publisher;
pub mod signal;

pub use builder::{select_parent_indices, BuildParams, SubtangleBuilder, Target, UNBOUNDED_RECORDS};
pub use config::GeneratorConfig;
pub use error::{BuildError, EngineError, PublishError};
pub use orchestrator::{Orchestrator, RunMode, RunOutcome};
pub use progress::PROGRESS_INTERVAL;
pub use publisher::{PublishReport, PublishSettings, Publisher, MAX_BROADCAST_ATTEMPTS};
pub use signal::{spawn_line_listener, stop_channel, StopHandle, StopSignal};
