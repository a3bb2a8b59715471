//! Integration tests — full parameter → validate → recompute → encode
//! round-trips exercising the public API the way the form UI does.

use edidgen_core::{
    BLOCK_LEN, DisplayTimingParams, Locks, ParamsPatch, TimingField, apply_external_update,
    artifact_filename, encode, presets, recompute, validate,
};

// ── Helpers ──────────────────────────────────────────────────────

/// The concrete 1080p60 scenario record.
fn scenario_params() -> DisplayTimingParams {
    DisplayTimingParams {
        display_name: "Test".into(),
        ..DisplayTimingParams::default()
    }
}

fn block_sum(block: &[u8]) -> u32 {
    block.iter().map(|&b| b as u32).sum()
}

// ── Length and checksum contracts ────────────────────────────────

#[test]
fn test_length_contract() {
    let mut params = scenario_params();
    assert_eq!(encode(&params).len(), BLOCK_LEN);

    params.audio.enabled = true;
    assert_eq!(encode(&params).len(), 2 * BLOCK_LEN);
}

#[test]
fn test_checksum_rolls_to_zero() {
    let mut params = scenario_params();
    params.audio.enabled = true;

    let bytes = encode(&params);
    assert_eq!(block_sum(&bytes[..BLOCK_LEN]) % 256, 0);
    assert_eq!(block_sum(&bytes[BLOCK_LEN..]) % 256, 0);
}

#[test]
fn test_checksum_holds_across_presets() {
    for preset in presets::all() {
        let bytes = encode(&preset.params);
        assert_eq!(block_sum(&bytes) % 256, 0, "{}", preset.id);
    }
}

#[test]
fn test_determinism() {
    let params = scenario_params();
    assert_eq!(encode(&params), encode(&params));
}

// ── Golden scenario ──────────────────────────────────────────────

#[test]
fn test_concrete_1080p60_scenario() {
    let bytes = encode(&scenario_params());
    assert_eq!(bytes.len(), 128);

    // Fixed prefix up to the year byte, then through feature support.
    assert_eq!(
        &bytes[..17],
        &[
            0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x1C, 0x8D, 0x01, 0x01, 0x01, 0x02,
            0x03, 0x04, 0x01,
        ]
    );
    assert_eq!(&bytes[18..25], &[0x01, 0x03, 0x80, 0x35, 0x1D, 0x78, 0x0A]);

    // Checksum closes the block.
    assert_eq!(block_sum(&bytes) % 256, 0);
}

#[test]
fn test_name_truncation() {
    let mut params = scenario_params();
    params.display_name = "TwentyCharactersName".into();
    let bytes = encode(&params);

    // Only the first 13 characters land in the descriptor; a name that
    // fills the field gets neither terminator nor padding.
    assert_eq!(&bytes[77..90], b"TwentyCharact");

    // A shorter name is 0x0A-terminated and space-padded through the
    // 13th slot (bytes 85..90 of the descriptor region).
    params.display_name = "Test".into();
    let bytes = encode(&params);
    assert_eq!(bytes[81], 0x0A);
    assert!(bytes[82..90].iter().all(|&b| b == 0x20));
}

// ── Consistency engine laws ──────────────────────────────────────

#[test]
fn test_inverse_law() {
    let no_locks = Locks::default();
    let base = scenario_params();

    for clock in [74_250u32, 148_500, 148_501, 297_000] {
        let edited = recompute(&base, TimingField::PixelClock, clock, no_locks);
        let back = recompute(&edited, TimingField::RefreshRate, edited.refresh_rate, no_locks);
        assert!(back.pixel_clock.abs_diff(clock) <= 1, "clock {clock}");
    }
}

#[test]
fn test_lock_enforcement() {
    let both = Locks { refresh_rate: true, pixel_clock: true };
    let before = scenario_params();

    for field in [
        TimingField::HAddressable,
        TimingField::HBlanking,
        TimingField::VAddressable,
        TimingField::VBlanking,
    ] {
        let after = recompute(&before, field, before.get(field) + 17, both);
        assert_eq!(after, before, "{} leaked through both locks", field.name());
    }
}

#[test]
fn test_external_update_end_to_end() {
    // Assistant supplies a 4K mode with one garbage field; the garbage
    // is dropped, the rate is re-derived, and the result encodes.
    let patch: ParamsPatch = serde_json::from_str(
        r#"{
            "displayName": "UHD Panel",
            "pixelClock": 594000,
            "hAddressable": 3840,
            "hBlanking": 560,
            "vAddressable": 2160,
            "vBlanking": 90,
            "hSyncWidth": "wide"
        }"#,
    )
    .unwrap();

    let updated = apply_external_update(&scenario_params(), &patch, Locks::default());
    assert_eq!(updated.display_name, "UHD Panel");
    assert_eq!(updated.refresh_rate, 60);
    assert_eq!(updated.h_sync_width, 44); // garbage dropped, old value kept

    let errors = validate(&updated);
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(encode(&updated).len(), BLOCK_LEN);
}

// ── Validator boundary ───────────────────────────────────────────

#[test]
fn test_back_porch_validator_boundary() {
    let mut params = scenario_params();

    params.h_blanking = params.h_front_porch + params.h_sync_width;
    assert!(validate(&params).get("hBlanking").is_some());

    params.h_blanking = params.h_front_porch + params.h_sync_width + 1;
    assert!(validate(&params).get("hBlanking").is_none());
}

#[test]
fn test_validation_blocks_generation() {
    let mut params = scenario_params();
    params.display_name.clear();
    params.pixel_clock = 0;

    let errors = validate(&params);
    assert_eq!(errors.len(), 2);
    assert!(errors.get("displayName").is_some());
    assert!(errors.get("pixelClock").is_some());
}

// ── Presets and artifacts ────────────────────────────────────────

#[test]
fn test_presets_encode_cleanly() {
    for preset in presets::all() {
        assert!(validate(&preset.params).is_empty(), "{}", preset.id);
        assert_eq!(encode(&preset.params).len(), BLOCK_LEN, "{}", preset.id);
    }
}

#[test]
fn test_artifact_filenames() {
    assert_eq!(artifact_filename("QHD 1440p60"), "QHD_1440p60.bin");
    assert_eq!(artifact_filename(""), "edid.bin");
}
