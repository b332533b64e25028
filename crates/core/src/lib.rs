//! CleanOps core domain logic.
//!
//! Pure, I/O-free building blocks for the inspection lifecycle engine:
//! status state machines, weighted scoring, corrective-action derivation,
//! completion validation, and inspection numbering. The `db` and `api`
//! crates both depend on this crate; it depends on nothing internal.

pub mod activity;
pub mod actions;
pub mod completion;
pub mod error;
pub mod numbering;
pub mod scoring;
pub mod status;
pub mod types;
