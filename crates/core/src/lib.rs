//! Domain logic for interview answer analysis.
//!
//! Everything here is free of I/O: metric derivation, the feedback prompt
//! and reply schema, session composition, and the traits the external
//! speech and generation providers implement.

pub mod error;
pub mod feedback;
pub mod metrics;
pub mod provider;
pub mod session;
pub mod types;
