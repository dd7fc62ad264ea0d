//! Path filtering.
//!
//! Glob compilation, include/exclude filters and their composition into an
//! inclusion policy.

pub mod glob;
pub mod pattern;
pub mod policy;

pub use glob::CompiledGlob;
pub use pattern::PatternFilter;
pub use policy::FilterPolicy;
