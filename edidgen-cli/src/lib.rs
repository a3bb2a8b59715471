//! # edidgen-cli — EDID Generator CLI
//!
//! Wraps `edidgen-core` in a command-line tool: loads a parameter
//! record from JSON or the preset catalog, optionally merges a sparse
//! update through the consistency engine, validates, encodes, and
//! writes the `.bin` artifact.

pub mod config;
