//! EDID 1.3 byte encoder.
//!
//! Pure function from a validated [`DisplayTimingParams`] to the binary
//! block a display would report over DDC. Layout of the 128-byte base
//! block:
//!
//! ```text
//! 0-7     header 00 FF FF FF FF FF FF 00
//! 8-17    vendor / product / serial / manufacture week + year
//! 18-19   EDID version 1.3
//! 20-24   video input, screen size (cm), gamma, feature support
//! 25-34   chromaticity coordinates (10-bit, packed)
//! 35-53   established + standard timings (unused filler)
//! 54-71   DTD 1 — the described timing
//! 72-89   DTD 2 — display product name descriptor (tag FC)
//! 90-125  descriptors 3/4 — dummy (tag 10)
//! 126     extension block count
//! 127     checksum (block sum ≡ 0 mod 256)
//! ```
//!
//! When audio is enabled a second 128-byte CEA-861 extension block
//! follows, carrying one LPCM Short Audio Descriptor.
//!
//! The encoder assumes validated input and never fails; callers verify
//! the 128/256 length contract as their success criterion.

use bytes::{BufMut, BytesMut};
use chrono::Datelike;

use crate::params::{AudioConfig, Colorimetry, DisplayTimingParams};

/// Length of one EDID block.
pub const BLOCK_LEN: usize = 128;

/// Fixed EDID header magic.
const HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Packed three-letter manufacturer id.
const MANUFACTURER_ID: [u8; 2] = [0x1C, 0x8D];

/// Placeholder product code and serial number.
const PRODUCT_CODE: [u8; 2] = [0x01, 0x01];
const SERIAL_NUMBER: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

/// Display-name descriptor capacity.
const NAME_LEN: usize = 13;

// ── encode ───────────────────────────────────────────────────────

/// Encode `params` into an EDID binary: 128 bytes, or 256 when the
/// audio extension block is enabled.
pub fn encode(params: &DisplayTimingParams) -> Vec<u8> {
    let mut out = BytesMut::with_capacity(2 * BLOCK_LEN);
    put_base_block(params, &mut out);
    if params.audio.enabled {
        put_cea_block(&params.audio, &mut out);
    }
    out.to_vec()
}

/// Filename for the downloadable artifact: the display name with
/// spaces replaced by underscores, `edid.bin` when the name is empty.
pub fn artifact_filename(display_name: &str) -> String {
    let name = display_name.trim();
    if name.is_empty() {
        "edid.bin".to_string()
    } else {
        format!("{}.bin", name.replace(' ', "_"))
    }
}

// ── Base block ───────────────────────────────────────────────────

fn put_base_block(params: &DisplayTimingParams, out: &mut BytesMut) {
    let start = out.len();

    out.put_slice(&HEADER);
    out.put_slice(&MANUFACTURER_ID);
    out.put_slice(&PRODUCT_CODE);
    out.put_slice(&SERIAL_NUMBER);
    out.put_u8(0x01); // manufacture week
    out.put_u8(manufacture_year_byte());
    out.put_slice(&[0x01, 0x03]); // EDID 1.3
    out.put_u8(0x80); // digital input, 8 bits per color
    out.put_u8(mm_to_cm(params.h_image_size));
    out.put_u8(mm_to_cm(params.v_image_size));
    out.put_u8(0x78); // gamma 2.2
    out.put_u8(0x0A); // feature support: sRGB default, preferred mode native
    put_chromaticity(&params.colorimetry, out);
    out.put_bytes(0x00, 3); // established timings: none
    out.put_bytes(0x01, 16); // standard timings: all unused
    put_detailed_timing(params, out);
    put_name_descriptor(&params.display_name, out);
    put_dummy_descriptor(out);
    put_dummy_descriptor(out);
    out.put_u8(if params.audio.enabled { 1 } else { 0 });
    put_checksum(start, out);
}

/// Image size byte: millimeters to whole centimeters, truncating.
fn mm_to_cm(mm: u32) -> u8 {
    (mm / 10).min(0xFF) as u8
}

/// Manufacture year byte: current calendar year − 1990.
fn manufacture_year_byte() -> u8 {
    (chrono::Local::now().year() - 1990).clamp(0, 255) as u8
}

/// 10-bit chromaticity value: `round(clamp(c, 0, 0.999) × 1024)`.
fn chroma10(value: f64) -> u16 {
    (value.clamp(0.0, 0.999) * 1024.0).round() as u16
}

/// Bytes 25–34: the eight coordinates at 10-bit precision. The two low
/// bits of each coordinate are packed four-per-byte into bytes 25/26;
/// the high 8 bits follow one byte per coordinate.
fn put_chromaticity(colorimetry: &Colorimetry, out: &mut BytesMut) {
    let [rx, ry, gx, gy, bx, by, wx, wy] =
        colorimetry.coords().map(|(_, value)| chroma10(value));

    out.put_u8((((rx & 0b11) << 6) | ((ry & 0b11) << 4) | ((gx & 0b11) << 2) | (gy & 0b11)) as u8);
    out.put_u8((((bx & 0b11) << 6) | ((by & 0b11) << 4) | ((wx & 0b11) << 2) | (wy & 0b11)) as u8);
    for high in [rx, ry, gx, gy, bx, by, wx, wy] {
        out.put_u8((high >> 2) as u8);
    }
}

/// Bytes 54–71: the 18-byte detailed timing descriptor.
fn put_detailed_timing(p: &DisplayTimingParams, out: &mut BytesMut) {
    out.put_u16_le((p.pixel_clock as f64 / 10.0).round() as u16); // 10 kHz units

    out.put_u8((p.h_addressable & 0xFF) as u8);
    out.put_u8((p.h_blanking & 0xFF) as u8);
    out.put_u8(((((p.h_addressable >> 8) & 0x0F) << 4) | ((p.h_blanking >> 8) & 0x0F)) as u8);

    out.put_u8((p.v_addressable & 0xFF) as u8);
    out.put_u8((p.v_blanking & 0xFF) as u8);
    out.put_u8(((((p.v_addressable >> 8) & 0x0F) << 4) | ((p.v_blanking >> 8) & 0x0F)) as u8);

    out.put_u8((p.h_front_porch & 0xFF) as u8);
    out.put_u8((p.h_sync_width & 0xFF) as u8);
    out.put_u8((((p.v_front_porch & 0x0F) << 4) | (p.v_sync_width & 0x0F)) as u8);
    out.put_u8(((((p.h_front_porch >> 8) & 0b11) << 6)
        | (((p.h_sync_width >> 8) & 0b11) << 4)
        | (((p.v_front_porch >> 4) & 0b11) << 2)
        | ((p.v_sync_width >> 4) & 0b11)) as u8);

    out.put_u8((p.h_image_size & 0xFF) as u8);
    out.put_u8((p.v_image_size & 0xFF) as u8);
    out.put_u8(((((p.h_image_size >> 8) & 0x0F) << 4) | ((p.v_image_size >> 8) & 0x0F)) as u8);

    out.put_u8(p.h_border.min(0xFF) as u8);
    out.put_u8(p.v_border.min(0xFF) as u8);
    out.put_u8(0x18); // digital separate sync, positive polarity
}

/// Bytes 72–89: display product name descriptor (tag FC). Up to 13
/// ASCII characters, 0x0A terminated when shorter, space padded.
fn put_name_descriptor(name: &str, out: &mut BytesMut) {
    out.put_slice(&[0x00, 0x00, 0x00, 0xFC, 0x00]);

    let mut field = [0x20u8; NAME_LEN];
    let mut used = 0;
    for c in name.chars().filter(char::is_ascii).take(NAME_LEN) {
        field[used] = c as u8;
        used += 1;
    }
    if used < NAME_LEN {
        field[used] = 0x0A;
    }
    out.put_slice(&field);
}

/// An 18-byte dummy descriptor (tag 10), used for slots 3 and 4.
fn put_dummy_descriptor(out: &mut BytesMut) {
    out.put_slice(&[0x00, 0x00, 0x00, 0x10]);
    out.put_bytes(0x00, 14);
}

/// Append the checksum byte making the block sum ≡ 0 (mod 256).
fn put_checksum(block_start: usize, out: &mut BytesMut) {
    let sum: u32 = out[block_start..].iter().map(|&b| b as u32).sum();
    out.put_u8(((256 - (sum % 256)) % 256) as u8);
}

// ── CEA-861 extension block ──────────────────────────────────────

/// The audio extension: CEA-861 revision 3 with basic-audio support
/// and a single LPCM Short Audio Descriptor.
fn put_cea_block(audio: &AudioConfig, out: &mut BytesMut) {
    let start = out.len();

    out.put_u8(0x02); // CEA-861 extension tag
    out.put_u8(0x03); // revision 3
    out.put_u8(0x08); // offset to detailed timings: header + one data block
    out.put_u8(0x40); // basic audio supported

    out.put_u8((1 << 5) | 3); // audio data block, 3-byte SAD
    out.put_u8((1 << 3) | (u8::from(audio.channels) - 1)); // LPCM, channels − 1
    out.put_u8(audio.sample_rates.bits());
    out.put_u8(audio.bit_depths.bits());

    out.put_bytes(0x00, BLOCK_LEN - 1 - (out.len() - start));
    put_checksum(start, out);
}

// ── Tests ────────────────────────────────────────────────────────
