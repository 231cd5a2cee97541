//! Tripline Core
//!
//! Decides which workflow definitions should run for a given CI event and
//! set of changed files. Data flows one way:
//!
//! raw definitions + event context + changed files
//! → [`filters::normalize`] → [`triggers::evaluate`] → [`detector::detect`]
//!
//! Nothing in this crate reads process environment; callers build an
//! [`EventContext`] up front and pass it in.

pub mod context;
pub mod detector;
pub mod error;
pub mod filters;
pub mod paths;
pub mod patterns;
pub mod pipeline;
pub mod triggers;
pub mod workflows;

pub use context::EventContext;
pub use detector::detect;
pub use error::{Error, Result};
pub use filters::FilterRecord;
pub use pipeline::{MatchResult, PipelineDefinition, TriggerValue};
