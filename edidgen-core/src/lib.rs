//! # edidgen-core
//!
//! Core library for the EDID generator.
//!
//! This crate contains:
//! - **Parameter model**: [`DisplayTimingParams`], [`TimingField`],
//!   [`ParamsPatch`], audio and colorimetry types
//! - **Validator**: [`validate`] — field-level range and consistency
//!   rules defining the legal input domain
//! - **Consistency engine**: [`recompute`] / [`apply_external_update`]
//!   keeping pixel clock, refresh rate, and blanking aligned under
//!   edits and lock constraints
//! - **Encoder**: [`encode`] — deterministic EDID 1.3 base block plus
//!   an optional CEA-861 audio extension block
//! - **Presets**: VESA DMT / CEA-861 standard timing catalog
//! - **Error**: [`EdidError`] — typed, `thiserror`-based error hierarchy
//!
//! Everything here is synchronous and side-effect free: the encoder and
//! validator are pure functions, the consistency engine a pure state
//! transition. Callers own the mutable state.

pub mod encoder;
pub mod error;
pub mod params;
pub mod presets;
pub mod timing;
pub mod validate;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use encoder::{BLOCK_LEN, artifact_filename, encode};
pub use error::EdidError;
pub use params::{
    AudioChannels, AudioConfig, BitDepths, Colorimetry, ColorimetryPatch, DisplayTimingParams,
    ParamsPatch, SampleRates, TimingField,
};
pub use presets::Preset;
pub use timing::{Locks, apply_external_update, recompute};
pub use validate::{ValidationErrors, validate};
