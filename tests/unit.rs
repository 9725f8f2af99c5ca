//! Unit-level tests that exercise the build pipeline one stage at a time,
//! calling each module's functions directly rather than going through
//! `Engine`, so a failure here points at a specific stage rather than the
//! pipeline as a whole.

mod common;

#[path = "unit/pipeline.rs"]
mod pipeline;
