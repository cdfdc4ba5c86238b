//! Metric definitions for tempvoice.
//!
//! Thin layer over the `metrics` crate facade: names live in [`definitions`],
//! the macros are re-exported so callers need a single import. Nothing is
//! exported until a recorder is installed by the host process.
//!
//! ```rust,ignore
//! use tempvoice_metrics::{counter, rooms};
//!
//! counter!(rooms::CREATED_TOTAL).increment(1);
//! ```

mod definitions;

pub use definitions::*;

pub use metrics::{counter, gauge};
