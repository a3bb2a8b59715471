//! Display timing parameter model.
//!
//! [`DisplayTimingParams`] is the record the validator, consistency
//! engine, and encoder all consume. The record is owned by the caller
//! (the form UI, the CLI) and passed by reference into pure functions —
//! no shared mutable state lives in this crate.
//!
//! Fields serialize in camelCase so the JSON boundary matches the form
//! field names (`pixelClock`, `hAddressable`, ...).

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EdidError;

// ── DisplayTimingParams ──────────────────────────────────────────

/// A full description of one display mode: timing, physical size,
/// color characteristics, and optional audio capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayTimingParams {
    /// Monitor name for the display-product-name descriptor. Longer
    /// values are truncated to 13 ASCII characters at encode time.
    pub display_name: String,

    /// Pixel clock in kHz.
    pub pixel_clock: u32,

    /// Horizontal addressable pixels.
    pub h_addressable: u32,
    /// Horizontal blanking pixels (front porch + sync width + back porch).
    pub h_blanking: u32,
    /// Vertical addressable lines.
    pub v_addressable: u32,
    /// Vertical blanking lines.
    pub v_blanking: u32,

    /// Horizontal front porch pixels.
    pub h_front_porch: u32,
    /// Horizontal sync pulse width in pixels.
    pub h_sync_width: u32,
    /// Vertical front porch lines.
    pub v_front_porch: u32,
    /// Vertical sync pulse width in lines.
    pub v_sync_width: u32,

    /// Horizontal image size in millimeters.
    pub h_image_size: u32,
    /// Vertical image size in millimeters.
    pub v_image_size: u32,

    /// Horizontal border pixels.
    pub h_border: u32,
    /// Vertical border lines.
    pub v_border: u32,

    /// Vertical refresh rate in Hz. Functionally dependent on the pixel
    /// clock and the totals; the consistency engine keeps them aligned.
    pub refresh_rate: u32,

    /// Audio capability block for the CEA-861 extension.
    pub audio: AudioConfig,

    /// CIE 1931 color characteristics.
    pub colorimetry: Colorimetry,
}

impl DisplayTimingParams {
    /// Horizontal total: addressable + blanking.
    pub fn h_total(&self) -> u32 {
        self.h_addressable.saturating_add(self.h_blanking)
    }

    /// Vertical total: addressable + blanking.
    pub fn v_total(&self) -> u32 {
        self.v_addressable.saturating_add(self.v_blanking)
    }

    /// Read the numeric field identified by `field`.
    pub fn get(&self, field: TimingField) -> u32 {
        match field {
            TimingField::PixelClock => self.pixel_clock,
            TimingField::HAddressable => self.h_addressable,
            TimingField::HBlanking => self.h_blanking,
            TimingField::VAddressable => self.v_addressable,
            TimingField::VBlanking => self.v_blanking,
            TimingField::HFrontPorch => self.h_front_porch,
            TimingField::HSyncWidth => self.h_sync_width,
            TimingField::VFrontPorch => self.v_front_porch,
            TimingField::VSyncWidth => self.v_sync_width,
            TimingField::HImageSize => self.h_image_size,
            TimingField::VImageSize => self.v_image_size,
            TimingField::HBorder => self.h_border,
            TimingField::VBorder => self.v_border,
            TimingField::RefreshRate => self.refresh_rate,
        }
    }

    /// Write the numeric field identified by `field`.
    pub fn set(&mut self, field: TimingField, value: u32) {
        match field {
            TimingField::PixelClock => self.pixel_clock = value,
            TimingField::HAddressable => self.h_addressable = value,
            TimingField::HBlanking => self.h_blanking = value,
            TimingField::VAddressable => self.v_addressable = value,
            TimingField::VBlanking => self.v_blanking = value,
            TimingField::HFrontPorch => self.h_front_porch = value,
            TimingField::HSyncWidth => self.h_sync_width = value,
            TimingField::VFrontPorch => self.v_front_porch = value,
            TimingField::VSyncWidth => self.v_sync_width = value,
            TimingField::HImageSize => self.h_image_size = value,
            TimingField::VImageSize => self.v_image_size = value,
            TimingField::HBorder => self.h_border = value,
            TimingField::VBorder => self.v_border = value,
            TimingField::RefreshRate => self.refresh_rate = value,
        }
    }
}

impl Default for DisplayTimingParams {
    /// CEA 1920×1080p60 — the timing the form opens with.
    fn default() -> Self {
        Self {
            display_name: "My Display".into(),
            pixel_clock: 148_500,
            h_addressable: 1920,
            h_blanking: 280,
            v_addressable: 1080,
            v_blanking: 45,
            h_front_porch: 88,
            h_sync_width: 44,
            v_front_porch: 4,
            v_sync_width: 5,
            h_image_size: 531,
            v_image_size: 299,
            h_border: 0,
            v_border: 0,
            refresh_rate: 60,
            audio: AudioConfig::default(),
            colorimetry: Colorimetry::default(),
        }
    }
}

// ── TimingField ──────────────────────────────────────────────────

/// Identifies the numeric timing field an edit targets.
///
/// Generic change handlers dispatch on this instead of field-name
/// strings; [`name`](TimingField::name) gives the camelCase key used at
/// the JSON boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingField {
    PixelClock,
    HAddressable,
    HBlanking,
    VAddressable,
    VBlanking,
    HFrontPorch,
    HSyncWidth,
    VFrontPorch,
    VSyncWidth,
    HImageSize,
    VImageSize,
    HBorder,
    VBorder,
    RefreshRate,
}

impl TimingField {
    /// Every editable numeric field, in form order.
    pub const ALL: [TimingField; 14] = [
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
        TimingField::HBorder,
        TimingField::VBorder,
        TimingField::RefreshRate,
    ];

    /// The camelCase field name used by the form and the JSON boundary.
    pub fn name(self) -> &'static str {
        match self {
            TimingField::PixelClock => "pixelClock",
            TimingField::HAddressable => "hAddressable",
            TimingField::HBlanking => "hBlanking",
            TimingField::VAddressable => "vAddressable",
            TimingField::VBlanking => "vBlanking",
            TimingField::HFrontPorch => "hFrontPorch",
            TimingField::HSyncWidth => "hSyncWidth",
            TimingField::VFrontPorch => "vFrontPorch",
            TimingField::VSyncWidth => "vSyncWidth",
            TimingField::HImageSize => "hImageSize",
            TimingField::VImageSize => "vImageSize",
            TimingField::HBorder => "hBorder",
            TimingField::VBorder => "vBorder",
            TimingField::RefreshRate => "refreshRate",
        }
    }
}

impl TryFrom<&str> for TimingField {
    type Error = EdidError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == value)
            .ok_or_else(|| EdidError::UnknownField(value.to_string()))
    }
}

impl std::fmt::Display for TimingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Audio ────────────────────────────────────────────────────────

/// Audio capabilities advertised through the CEA-861 extension block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioConfig {
    /// Whether to emit the extension block at all.
    pub enabled: bool,
    /// LPCM channel count.
    pub channels: AudioChannels,
    /// Supported sample rates.
    #[serde(with = "sample_rate_list")]
    pub sample_rates: SampleRates,
    /// Supported bit depths.
    #[serde(with = "bit_depth_list")]
    pub bit_depths: BitDepths,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channels: AudioChannels::Two,
            sample_rates: SampleRates::KHZ_32 | SampleRates::KHZ_44_1 | SampleRates::KHZ_48,
            bit_depths: BitDepths::BIT_16 | BitDepths::BIT_20 | BitDepths::BIT_24,
        }
    }
}

/// LPCM channel count. The discriminant is the channel count itself;
/// the SAD encodes `count - 1`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AudioChannels {
    /// 2.0 stereo.
    Two = 2,
    /// 5.1 surround.
    Six = 6,
    /// 7.1 surround.
    Eight = 8,
}

impl TryFrom<u8> for AudioChannels {
    type Error = EdidError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(AudioChannels::Two),
            6 => Ok(AudioChannels::Six),
            8 => Ok(AudioChannels::Eight),
            _ => Err(EdidError::UnknownVariant {
                type_name: "AudioChannels",
                value: value as u64,
            }),
        }
    }
}

impl From<AudioChannels> for u8 {
    fn from(channels: AudioChannels) -> u8 {
        channels as u8
    }
}

bitflags! {
    /// Supported LPCM sample rates. Bit positions are exactly the mask
    /// carried in byte 2 of the Short Audio Descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SampleRates: u8 {
        const KHZ_32  = 1 << 0;
        const KHZ_44_1 = 1 << 1;
        const KHZ_48  = 1 << 2;
        const KHZ_96  = 1 << 3;
        const KHZ_192 = 1 << 4;
    }
}

impl SampleRates {
    const TABLE: [(SampleRates, f64); 5] = [
        (SampleRates::KHZ_32, 32.0),
        (SampleRates::KHZ_44_1, 44.1),
        (SampleRates::KHZ_48, 48.0),
        (SampleRates::KHZ_96, 96.0),
        (SampleRates::KHZ_192, 192.0),
    ];

    /// Match a numeric kHz value from the JSON boundary to a flag.
    /// Unknown rates map to `None` and are dropped by the caller.
    pub fn from_khz(khz: f64) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, v)| (khz - v).abs() < 0.05)
            .map(|(flag, _)| *flag)
    }
}

bitflags! {
    /// Supported LPCM bit depths. Bit positions are exactly the mask
    /// carried in byte 3 of the Short Audio Descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BitDepths: u8 {
        const BIT_16 = 1 << 0;
        const BIT_20 = 1 << 1;
        const BIT_24 = 1 << 2;
    }
}

impl BitDepths {
    const TABLE: [(BitDepths, u8); 3] = [
        (BitDepths::BIT_16, 16),
        (BitDepths::BIT_20, 20),
        (BitDepths::BIT_24, 24),
    ];

    /// Match a bits-per-sample value from the JSON boundary to a flag.
    pub fn from_bits_per_sample(bits: u8) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, v)| *v == bits)
            .map(|(flag, _)| *flag)
    }
}

/// Serde bridge: `SampleRates` ↔ a JSON array of kHz numbers
/// (`[32, 44.1, 48]`). Unknown entries are silently ignored.
mod sample_rate_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::SampleRates;

    pub fn serialize<S: Serializer>(rates: &SampleRates, serializer: S) -> Result<S::Ok, S::Error> {
        let list: Vec<f64> = SampleRates::TABLE
            .iter()
            .filter(|(flag, _)| rates.contains(*flag))
            .map(|(_, khz)| *khz)
            .collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SampleRates, D::Error> {
        let raw = Vec::<f64>::deserialize(deserializer)?;
        let mut rates = SampleRates::empty();
        for khz in raw {
            if let Some(flag) = SampleRates::from_khz(khz) {
                rates |= flag;
            }
        }
        Ok(rates)
    }
}

/// Serde bridge: `BitDepths` ↔ a JSON array of bit counts (`[16, 24]`).
mod bit_depth_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::BitDepths;

    pub fn serialize<S: Serializer>(depths: &BitDepths, serializer: S) -> Result<S::Ok, S::Error> {
        let list: Vec<u8> = BitDepths::TABLE
            .iter()
            .filter(|(flag, _)| depths.contains(*flag))
            .map(|(_, bits)| *bits)
            .collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BitDepths, D::Error> {
        let raw = Vec::<u8>::deserialize(deserializer)?;
        let mut depths = BitDepths::empty();
        for bits in raw {
            if let Some(flag) = BitDepths::from_bits_per_sample(bits) {
                depths |= flag;
            }
        }
        Ok(depths)
    }
}

// ── Colorimetry ──────────────────────────────────────────────────

/// CIE 1931 chromaticity coordinates, each a fraction in `[0, 0.999]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Colorimetry {
    pub red_x: f64,
    pub red_y: f64,
    pub green_x: f64,
    pub green_y: f64,
    pub blue_x: f64,
    pub blue_y: f64,
    pub white_x: f64,
    pub white_y: f64,
}

impl Colorimetry {
    /// Coordinates with their JSON field names, in EDID packing order.
    pub fn coords(&self) -> [(&'static str, f64); 8] {
        [
            ("redX", self.red_x),
            ("redY", self.red_y),
            ("greenX", self.green_x),
            ("greenY", self.green_y),
            ("blueX", self.blue_x),
            ("blueY", self.blue_y),
            ("whiteX", self.white_x),
            ("whiteY", self.white_y),
        ]
    }
}

impl Default for Colorimetry {
    /// sRGB primaries with a D65 white point.
    fn default() -> Self {
        Self {
            red_x: 0.640,
            red_y: 0.330,
            green_x: 0.300,
            green_y: 0.600,
            blue_x: 0.150,
            blue_y: 0.060,
            white_x: 0.3127,
            white_y: 0.3290,
        }
    }
}

// ── ParamsPatch ──────────────────────────────────────────────────

/// A sparse field update supplied by an external source (the
/// conversational assistant).
///
/// Every field is optional, and numeric fields deserialize leniently:
/// a non-numeric or non-finite JSON value becomes `None` instead of a
/// deserialization error, so one malformed field never rejects the
/// whole update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamsPatch {
    pub display_name: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub pixel_clock: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub h_addressable: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub h_blanking: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub v_addressable: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub v_blanking: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub h_front_porch: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub h_sync_width: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub v_front_porch: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub v_sync_width: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub h_image_size: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub v_image_size: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub h_border: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub v_border: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    pub refresh_rate: Option<u32>,
    pub colorimetry: Option<ColorimetryPatch>,
}

impl ParamsPatch {
    /// Read the supplied value for a numeric field, if any.
    pub fn get(&self, field: TimingField) -> Option<u32> {
        match field {
            TimingField::PixelClock => self.pixel_clock,
            TimingField::HAddressable => self.h_addressable,
            TimingField::HBlanking => self.h_blanking,
            TimingField::VAddressable => self.v_addressable,
            TimingField::VBlanking => self.v_blanking,
            TimingField::HFrontPorch => self.h_front_porch,
            TimingField::HSyncWidth => self.h_sync_width,
            TimingField::VFrontPorch => self.v_front_porch,
            TimingField::VSyncWidth => self.v_sync_width,
            TimingField::HImageSize => self.h_image_size,
            TimingField::VImageSize => self.v_image_size,
            TimingField::HBorder => self.h_border,
            TimingField::VBorder => self.v_border,
            TimingField::RefreshRate => self.refresh_rate,
        }
    }
}

/// Sparse colorimetry update; coordinates merge individually.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorimetryPatch {
    #[serde(deserialize_with = "lenient_f64")]
    pub red_x: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub red_y: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub green_x: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub green_y: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub blue_x: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub blue_y: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub white_x: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub white_y: Option<f64>,
}

impl ColorimetryPatch {
    /// Apply every supplied coordinate to `target`.
    pub fn merge_into(&self, target: &mut Colorimetry) {
        let pairs = [
            (self.red_x, &mut target.red_x),
            (self.red_y, &mut target.red_y),
            (self.green_x, &mut target.green_x),
            (self.green_y, &mut target.green_y),
            (self.blue_x, &mut target.blue_x),
            (self.blue_y, &mut target.blue_y),
            (self.white_x, &mut target.white_x),
            (self.white_y, &mut target.white_y),
        ];
        for (supplied, slot) in pairs {
            if let Some(value) = supplied {
                *slot = value;
            }
        }
    }
}

/// Accept any JSON value; keep it only if it is a finite, non-negative
/// number. Everything else becomes `None`.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u32))
}

/// Accept any JSON value; keep it only if it is a finite number.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()))
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_roundtrip() {
        for channels in [AudioChannels::Two, AudioChannels::Six, AudioChannels::Eight] {
            assert_eq!(AudioChannels::try_from(channels as u8).unwrap(), channels);
        }
    }

    #[test]
    fn channels_invalid() {
        assert!(AudioChannels::try_from(4).is_err());
        assert!(AudioChannels::try_from(0).is_err());
    }

    #[test]
    fn field_name_roundtrip() {
        for field in TimingField::ALL {
            assert_eq!(TimingField::try_from(field.name()).unwrap(), field);
        }
        assert!(TimingField::try_from("displayName").is_err());
    }

    #[test]
    fn get_set_dispatch() {
        let mut params = DisplayTimingParams::default();
        for field in TimingField::ALL {
            params.set(field, 7777);
            assert_eq!(params.get(field), 7777);
        }
    }

    #[test]
    fn params_json_uses_camel_case() {
        let json = serde_json::to_value(DisplayTimingParams::default()).unwrap();
        assert!(json.get("pixelClock").is_some());
        assert!(json.get("hAddressable").is_some());
        assert_eq!(json["colorimetry"]["redX"], serde_json::json!(0.640));
    }

    #[test]
    fn sample_rate_list_roundtrip() {
        let audio = AudioConfig {
            enabled: true,
            channels: AudioChannels::Eight,
            sample_rates: SampleRates::KHZ_44_1 | SampleRates::KHZ_192,
            bit_depths: BitDepths::BIT_24,
        };
        let json = serde_json::to_string(&audio).unwrap();
        let parsed: AudioConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, audio);
    }

    #[test]
    fn unknown_sample_rates_are_ignored() {
        let parsed: AudioConfig =
            serde_json::from_str(r#"{"sampleRates": [48, 11.025, 88.2], "bitDepths": [24, 32]}"#)
                .unwrap();
        assert_eq!(parsed.sample_rates, SampleRates::KHZ_48);
        assert_eq!(parsed.bit_depths, BitDepths::BIT_24);
    }

    #[test]
    fn patch_drops_malformed_fields() {
        let patch: ParamsPatch = serde_json::from_str(
            r#"{"pixelClock": "fast", "hAddressable": 2560, "refreshRate": null}"#,
        )
        .unwrap();
        assert_eq!(patch.pixel_clock, None);
        assert_eq!(patch.h_addressable, Some(2560));
        assert_eq!(patch.refresh_rate, None);
    }

    #[test]
    fn patch_rounds_fractional_numbers() {
        let patch: ParamsPatch = serde_json::from_str(r#"{"refreshRate": 59.94}"#).unwrap();
        assert_eq!(patch.refresh_rate, Some(60));
    }

    #[test]
    fn colorimetry_patch_merges_individually() {
        let patch: ColorimetryPatch =
            serde_json::from_str(r#"{"redX": 0.68, "whiteY": "warm"}"#).unwrap();
        let mut colorimetry = Colorimetry::default();
        patch.merge_into(&mut colorimetry);
        assert_eq!(colorimetry.red_x, 0.68);
        assert_eq!(colorimetry.white_y, 0.3290);
    }
}
