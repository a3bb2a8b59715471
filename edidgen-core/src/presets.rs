//! VESA DMT / CEA-861 standard timing presets.
//!
//! Presets are complete, internally consistent parameter records that
//! replace the working record wholesale — they never pass through the
//! consistency engine. Timing numbers come from the DMT and CEA-861
//! tables; image sizes are typical panel diagonals for the resolution.

use crate::params::DisplayTimingParams;

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct Preset {
    /// Stable identifier (`cea-1920x1080-60`).
    pub id: &'static str,
    /// Human-readable label for pickers.
    pub label: &'static str,
    /// The full parameter record.
    pub params: DisplayTimingParams,
}

/// The full preset catalog, in ascending resolution order.
pub fn all() -> Vec<Preset> {
    vec![
        Preset {
            id: "dmt-640x480-60",
            label: "640×480 @ 60 Hz (VESA DMT)",
            params: timing("VGA 640x480", 25_175, 640, 160, 16, 96, 480, 45, 10, 2, 304, 228, 60),
        },
        Preset {
            id: "dmt-800x600-60",
            label: "800×600 @ 60 Hz (VESA DMT)",
            params: timing("SVGA 800x600", 40_000, 800, 256, 40, 128, 600, 28, 1, 4, 331, 249, 60),
        },
        Preset {
            id: "dmt-1024x768-60",
            label: "1024×768 @ 60 Hz (VESA DMT)",
            params: timing("XGA 1024x768", 65_000, 1024, 320, 24, 136, 768, 38, 3, 6, 376, 301, 60),
        },
        Preset {
            id: "cea-1280x720-60",
            label: "1280×720 @ 60 Hz (CEA-861)",
            params: timing("HD 720p60", 74_250, 1280, 370, 110, 40, 720, 30, 5, 5, 521, 293, 60),
        },
        Preset {
            id: "cea-1920x1080-60",
            label: "1920×1080 @ 60 Hz (CEA-861)",
            params: timing("FHD 1080p60", 148_500, 1920, 280, 88, 44, 1080, 45, 4, 5, 531, 299, 60),
        },
        Preset {
            id: "cvt-2560x1440-60",
            label: "2560×1440 @ 60 Hz (CVT-RB)",
            params: timing("QHD 1440p60", 241_500, 2560, 160, 48, 32, 1440, 41, 3, 5, 596, 335, 60),
        },
        Preset {
            id: "cea-3840x2160-30",
            label: "3840×2160 @ 30 Hz (CEA-861)",
            params: timing("UHD 2160p30", 297_000, 3840, 560, 176, 88, 2160, 90, 8, 10, 878, 485, 30),
        },
        Preset {
            id: "cea-3840x2160-60",
            label: "3840×2160 @ 60 Hz (CEA-861)",
            params: timing("UHD 2160p60", 594_000, 3840, 560, 176, 88, 2160, 90, 8, 10, 878, 485, 60),
        },
    ]
}

/// Look up a preset record by id.
pub fn find(id: &str) -> Option<DisplayTimingParams> {
    all().into_iter().find(|preset| preset.id == id).map(|preset| preset.params)
}

#[allow(clippy::too_many_arguments)]
fn timing(
    name: &str,
    pixel_clock: u32,
    h_addressable: u32,
    h_blanking: u32,
    h_front_porch: u32,
    h_sync_width: u32,
    v_addressable: u32,
    v_blanking: u32,
    v_front_porch: u32,
    v_sync_width: u32,
    h_image_size: u32,
    v_image_size: u32,
    refresh_rate: u32,
) -> DisplayTimingParams {
    DisplayTimingParams {
        display_name: name.into(),
        pixel_clock,
        h_addressable,
        h_blanking,
        v_addressable,
        v_blanking,
        h_front_porch,
        h_sync_width,
        v_front_porch,
        v_sync_width,
        h_image_size,
        v_image_size,
        h_border: 0,
        v_border: 0,
        refresh_rate,
        ..DisplayTimingParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    #[test]
    fn ids_are_unique() {
        let catalog = all();
        for (i, a) in catalog.iter().enumerate() {
            for b in &catalog[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn every_preset_validates() {
        for preset in all() {
            let errors = validate(&preset.params);
            assert!(errors.is_empty(), "{}: {errors}", preset.id);
        }
    }

    #[test]
    fn stored_rate_matches_derived_rate() {
        for preset in all() {
            let p = &preset.params;
            let derived = (p.pixel_clock as f64 * 1000.0
                / (p.h_total() as f64 * p.v_total() as f64))
                .round() as u32;
            assert_eq!(p.refresh_rate, derived, "{}", preset.id);
        }
    }

    #[test]
    fn find_by_id() {
        let params = find("cea-1920x1080-60").unwrap();
        assert_eq!(params.h_addressable, 1920);
        assert_eq!(params.pixel_clock, 148_500);
        assert!(find("cga-320x200-70").is_none());
    }
}
