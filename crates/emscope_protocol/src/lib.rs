//! Shared types for the emscope workspace.
//!
//! Every crate speaks the same target vocabulary: the flat OEM catalog rows,
//! the tagged targets the mapper emits, and the property payloads used for
//! topology enrichment. Naming helpers and filesystem path resolution live
//! here too so the mapper, cache, and config store agree on both.

pub mod naming;
pub mod paths;
pub mod types;

pub use types::{PropertyItem, TaggedTarget, Target, TargetProperties, TargetType};
