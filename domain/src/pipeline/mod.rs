//! Pipeline domain: stages, run state and per-run value objects.

pub mod entities;
pub mod value_objects;

pub use entities::{PipelineRun, PipelineState, Stage};
pub use value_objects::{Draft, PipelineResult, SynthesisResult};
