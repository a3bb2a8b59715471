//! Parameter validation — defines the legal input domain the encoder
//! may assume.
//!
//! The validator is consulted before every encode attempt and after
//! every field change for live form feedback. It performs no mutation
//! and has no side effects; the result is a field-name → message map
//! (empty = valid).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::params::{DisplayTimingParams, TimingField};

// ── ValidationErrors ─────────────────────────────────────────────

/// Field-level validation errors keyed by the camelCase JSON field
/// name. Ordered so form feedback and CLI output are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    /// Record an error for `field`, keeping the first message when a
    /// field already has one.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The error message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

// ── validate ─────────────────────────────────────────────────────

/// Fields that must be strictly positive.
const POSITIVE_FIELDS: [TimingField; 12] = [
    TimingField::PixelClock,
    TimingField::HAddressable,
    TimingField::HBlanking,
    TimingField::VAddressable,
    TimingField::VBlanking,
    TimingField::HFrontPorch,
    TimingField::HSyncWidth,
    TimingField::VFrontPorch,
    TimingField::VSyncWidth,
    TimingField::HImageSize,
    TimingField::VImageSize,
    TimingField::RefreshRate,
];

/// Check every field rule and return the error map.
///
/// `hBorder`/`vBorder` only need to be ≥ 0, which the unsigned model
/// guarantees, so no check is emitted for them.
pub fn validate(params: &DisplayTimingParams) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let name = params.display_name.trim();
    if name.is_empty() {
        errors.insert("displayName", "display name must not be empty");
    } else if name.len() > 13 {
        errors.insert("displayName", "display name must be at most 13 characters");
    }

    for field in POSITIVE_FIELDS {
        if params.get(field) == 0 {
            errors.insert(field.name(), format!("{} must be greater than zero", field.name()));
        }
    }

    for (field, value) in params.colorimetry.coords() {
        if !value.is_finite() || !(0.0..=0.999).contains(&value) {
            errors.insert(field, "must be a number between 0 and 0.999");
        }
    }

    // Range advisories, only meaningful once the base check passed.
    if params.pixel_clock > 0 && params.pixel_clock > 1_000_000 {
        errors.insert("pixelClock", "pixel clock must be at most 1000000 kHz");
    }
    if params.h_addressable > 0 && !(320..=8192).contains(&params.h_addressable) {
        errors.insert("hAddressable", "horizontal resolution must be between 320 and 8192");
    }
    if params.v_addressable > 0 && !(240..=4320).contains(&params.v_addressable) {
        errors.insert("vAddressable", "vertical resolution must be between 240 and 4320");
    }
    if params.refresh_rate > 0 && !(24..=240).contains(&params.refresh_rate) {
        errors.insert("refreshRate", "refresh rate must be between 24 and 240 Hz");
    }

    // Back porch = blanking − front porch − sync width must stay positive.
    if params.h_blanking > 0
        && params.h_front_porch > 0
        && params.h_sync_width > 0
        && params.h_blanking <= params.h_front_porch + params.h_sync_width
    {
        errors.insert(
            "hBlanking",
            "horizontal blanking must exceed front porch plus sync width",
        );
    }
    if params.v_blanking > 0
        && params.v_front_porch > 0
        && params.v_sync_width > 0
        && params.v_blanking <= params.v_front_porch + params.v_sync_width
    {
        errors.insert(
            "vBlanking",
            "vertical blanking must exceed front porch plus sync width",
        );
    }

    if params.audio.enabled {
        if params.audio.sample_rates.is_empty() {
            errors.insert("audioSampleRates", "select at least one sample rate");
        }
        if params.audio.bit_depths.is_empty() {
            errors.insert("audioBitDepths", "select at least one bit depth");
        }
    }

    errors
}

// ── Tests ────────────────────────────────────────────────────────
