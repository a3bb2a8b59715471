//! Timing consistency engine.
//!
//! Pixel clock, refresh rate, and the horizontal/vertical totals are
//! tied together by `pixelClock ≈ refreshRate × hTotal × vTotal / 1000`.
//! Whenever one side of that relation is edited the engine re-derives
//! another so the record stays physically consistent:
//!
//! - **Timing edit** (addressable/blanking): re-derive the refresh rate,
//!   or the pixel clock when the refresh rate is locked. With both
//!   quantities locked the edit cannot be reconciled and is rejected.
//! - **Refresh-rate edit**: re-derive the pixel clock, or — when the
//!   pixel clock is locked — hold the total pixel area constant and
//!   re-derive blanking at the previous aspect ratio.
//! - **Pixel-clock edit**: symmetric to the refresh-rate case.
//!
//! All derived integers round half away from zero. Every state
//! transition is pure: the input record is never mutated.

use crate::params::{DisplayTimingParams, ParamsPatch, TimingField};

// ── Locks ────────────────────────────────────────────────────────

/// Which derived quantities the user has pinned.
///
/// Locks are engine call parameters, deliberately not part of
/// [`DisplayTimingParams`] — the record describes the display, locks
/// describe the edit session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Locks {
    /// Hold the refresh rate; timing edits re-derive the pixel clock.
    pub refresh_rate: bool,
    /// Hold the pixel clock; rate edits re-derive blanking.
    pub pixel_clock: bool,
}

// ── recompute ────────────────────────────────────────────────────

/// Apply a single field edit and re-derive dependent fields.
///
/// The raw edit always lands first. If either total is zero afterwards
/// the record is returned with only the raw edit applied — the derived
/// recompute would divide by zero. The one exception is a timing edit
/// under both locks, which is discarded wholesale and returns the
/// previous record unchanged.
pub fn recompute(
    current: &DisplayTimingParams,
    field: TimingField,
    value: u32,
    locks: Locks,
) -> DisplayTimingParams {
    let mut params = current.clone();
    params.set(field, value);

    let h_total = params.h_total();
    let v_total = params.v_total();
    if h_total == 0 || v_total == 0 {
        return params;
    }

    match field {
        TimingField::HAddressable
        | TimingField::HBlanking
        | TimingField::VAddressable
        | TimingField::VBlanking => {
            if locks.refresh_rate && locks.pixel_clock {
                return current.clone();
            }
            if locks.refresh_rate {
                params.pixel_clock = derived_pixel_clock(params.refresh_rate, h_total, v_total);
            } else {
                params.refresh_rate = derived_refresh_rate(params.pixel_clock, h_total, v_total);
            }
        }
        TimingField::RefreshRate => {
            if locks.pixel_clock {
                rederive_blanking(&mut params, current);
            } else {
                params.pixel_clock = derived_pixel_clock(params.refresh_rate, h_total, v_total);
            }
        }
        TimingField::PixelClock => {
            if locks.refresh_rate {
                rederive_blanking(&mut params, current);
            } else {
                params.refresh_rate = derived_refresh_rate(params.pixel_clock, h_total, v_total);
            }
        }
        // Porches, sync widths, image sizes, and borders do not move
        // the pixel-clock relation; the raw edit stands alone.
        _ => {}
    }

    params
}

// ── apply_external_update ────────────────────────────────────────

/// Merge a sparse update from an external source (the assistant) and
/// run exactly one derived recompute.
///
/// A supplied pixel clock re-derives the refresh rate (unless the
/// refresh rate is locked); otherwise a supplied refresh rate
/// re-derives the pixel clock (unless that is locked). When both are
/// supplied the pixel clock takes precedence. Blanking is never
/// mutated here — sparse updates carry no aspect intent.
pub fn apply_external_update(
    current: &DisplayTimingParams,
    patch: &ParamsPatch,
    locks: Locks,
) -> DisplayTimingParams {
    let mut params = current.clone();

    if let Some(name) = &patch.display_name {
        params.display_name = name.clone();
    }
    for field in TimingField::ALL {
        if let Some(value) = patch.get(field) {
            params.set(field, value);
        }
    }
    if let Some(colorimetry) = &patch.colorimetry {
        colorimetry.merge_into(&mut params.colorimetry);
    }

    let h_total = params.h_total();
    let v_total = params.v_total();
    if h_total == 0 || v_total == 0 {
        return params;
    }

    if patch.pixel_clock.is_some() && !locks.refresh_rate {
        params.refresh_rate = derived_refresh_rate(params.pixel_clock, h_total, v_total);
    } else if patch.refresh_rate.is_some() && !locks.pixel_clock {
        params.pixel_clock = derived_pixel_clock(params.refresh_rate, h_total, v_total);
    }

    params
}

// ── Derivations ──────────────────────────────────────────────────

/// `refreshRate = round(pixelClock × 1000 / (hTotal × vTotal))`
fn derived_refresh_rate(pixel_clock: u32, h_total: u32, v_total: u32) -> u32 {
    let total = h_total as f64 * v_total as f64;
    (pixel_clock as f64 * 1000.0 / total).round() as u32
}

/// `pixelClock = round(refreshRate × hTotal × vTotal / 1000)`
fn derived_pixel_clock(refresh_rate: u32, h_total: u32, v_total: u32) -> u32 {
    (refresh_rate as f64 * h_total as f64 * v_total as f64 / 1000.0).round() as u32
}

/// Hold the total pixel area implied by the (possibly just-edited)
/// pixel clock and refresh rate constant, preserve the previous
/// hTotal/vTotal aspect ratio, and re-derive both blanking intervals.
///
/// Commits only when neither derived blanking would go negative;
/// otherwise blanking is left untouched.
fn rederive_blanking(params: &mut DisplayTimingParams, previous: &DisplayTimingParams) {
    if params.refresh_rate == 0 {
        return;
    }
    let total_area = params.pixel_clock as f64 * 1000.0 / params.refresh_rate as f64;
    let aspect = previous.h_total() as f64 / previous.v_total() as f64;
    let new_v_total = (total_area / aspect).sqrt();
    let new_h_total = total_area / new_v_total;

    let h_blanking = (new_h_total - params.h_addressable as f64).round();
    let v_blanking = (new_v_total - params.v_addressable as f64).round();
    if h_blanking >= 0.0 && v_blanking >= 0.0 {
        params.h_blanking = h_blanking as u32;
        params.v_blanking = v_blanking as u32;
    }
}

// ── Tests ────────────────────────────────────────────────────────
