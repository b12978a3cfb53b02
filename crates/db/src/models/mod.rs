//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching database rows
//! - Document bodies stored as JSON beneath a root row

pub mod session;
