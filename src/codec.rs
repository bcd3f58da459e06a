//! 24-bit fixed-point coordinate encoding.
//!
//! A coordinate along one axis is stored as signed micrometers biased by
//! `2^23`, packed big-endian into the R, G and B channels of one 8-bit color
//! pixel. This gives micrometer resolution over roughly ±8.388 meters without
//! needing a floating-point render target.
//!
//! The two extremes of the range are reserved: `0x000000` and `0xFFFFFF`
//! mean "no surface here" (the target is cleared to `0xFFFFFF`). The encoder
//! never produces either value; coordinates beyond the representable range
//! saturate one step inside it.

use glam::DVec3;

/// Bias added to the signed micrometer value so it is non-negative.
pub const COORDINATE_BIAS: u32 = 1 << 23;

/// Largest value that fits in the three color channels.
pub const MAX_ENCODED: u32 = (1 << 24) - 1;

/// Reserved all-zero sentinel.
pub const SENTINEL_LOW: u32 = 0x00_0000;

/// Reserved all-ones sentinel; also the background the target is cleared to.
pub const SENTINEL_HIGH: u32 = 0xFF_FFFF;

/// Micrometers per millimeter.
pub const MICRONS_PER_MM: f64 = 1000.0;

/// Mask selecting the RGB part of a packed `0xAARRGGBB` pixel.
const RGB_MASK: u32 = 0x00FF_FFFF;

/// One of the three spatial axes a coordinate pass can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// World X.
    X,
    /// World Y (up; the build plate lies in the XZ plane).
    Y,
    /// World Z.
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Axis index as used by the shader uniform (0, 1 or 2).
    #[must_use]
    pub fn index(self) -> u32 {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Axis from its uniform index, `None` for anything outside `0..=2`.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// The component of `v` along this axis.
    #[must_use]
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    /// Short lowercase label used in logs and GPU resource names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Encode a millimeter coordinate into the 24-bit channel value.
///
/// Rounds to the nearest micrometer and saturates into
/// `[SENTINEL_LOW + 1, SENTINEL_HIGH - 1]`. Non-finite input encodes as 0 mm.
#[must_use]
pub fn encode_mm(value_mm: f64) -> u32 {
    let bias = f64::from(COORDINATE_BIAS);
    let micrometers = if value_mm.is_finite() {
        (value_mm * MICRONS_PER_MM).round()
    } else {
        0.0
    };
    let lo = f64::from(SENTINEL_LOW + 1) - bias;
    let hi = f64::from(SENTINEL_HIGH - 1) - bias;
    (micrometers.clamp(lo, hi) + bias) as u32
}

/// Decode a packed pixel into millimeters.
///
/// The alpha byte of a `0xAARRGGBB` readback is ignored. Returns `None` for
/// either sentinel, so background never reads as a real coordinate.
#[must_use]
pub fn decode_raw(pixel: u32) -> Option<f64> {
    let raw = pixel & RGB_MASK;
    if raw == SENTINEL_LOW || raw == SENTINEL_HIGH {
        return None;
    }
    Some((f64::from(raw) - f64::from(COORDINATE_BIAS)) / MICRONS_PER_MM)
}

/// Split a 24-bit value into `[r, g, b, alpha]` bytes.
#[must_use]
pub fn to_rgba8(encoded: u32, alpha: u8) -> [u8; 4] {
    [
        ((encoded >> 16) & 0xFF) as u8,
        ((encoded >> 8) & 0xFF) as u8,
        (encoded & 0xFF) as u8,
        alpha,
    ]
}

/// Pack `[r, g, b, a]` bytes as read back from an `Rgba8Unorm` target into a
/// `0xAARRGGBB` word.
#[must_use]
pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> u32 {
    u32::from_be_bytes([a, r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_stays_within_one_micrometer() {
        let mut v = -8388.6;
        while v < 8388.6 {
            let decoded = decode_raw(encode_mm(v)).unwrap();
            assert!(
                (decoded - v).abs() <= 0.001,
                "{v} decoded as {decoded}"
            );
            v += 37.123_457;
        }
        for v in [0.0, 0.000_4, -0.000_4, 0.001, -0.001, 123.456, -123.456] {
            let decoded = decode_raw(encode_mm(v)).unwrap();
            assert!((decoded - v).abs() <= 0.001);
        }
    }

    #[test]
    fn sentinels_decode_to_none() {
        assert_eq!(decode_raw(SENTINEL_LOW), None);
        assert_eq!(decode_raw(SENTINEL_HIGH), None);
        // Alpha is ignored: a cleared target reads back as 0x00FFFFFF and a
        // fully opaque black pixel as 0xFF000000.
        assert_eq!(decode_raw(0x00FF_FFFF), None);
        assert_eq!(decode_raw(0xFF00_0000), None);
        assert_eq!(decode_raw(0xFFFF_FFFF), None);
    }

    #[test]
    fn zero_sits_at_the_bias() {
        assert_eq!(encode_mm(0.0), COORDINATE_BIAS);
        assert_eq!(decode_raw(COORDINATE_BIAS), Some(0.0));
        assert_eq!(decode_raw(COORDINATE_BIAS + 1500), Some(1.5));
        assert_eq!(decode_raw(COORDINATE_BIAS - 2500), Some(-2.5));
    }

    #[test]
    fn out_of_range_saturates_inside_the_sentinels() {
        assert_eq!(encode_mm(1.0e9), SENTINEL_HIGH - 1);
        assert_eq!(encode_mm(-1.0e9), SENTINEL_LOW + 1);
        assert!(decode_raw(encode_mm(1.0e9)).is_some());
        assert!(decode_raw(encode_mm(-1.0e9)).is_some());
        assert_eq!(encode_mm(f64::NAN), COORDINATE_BIAS);
    }

    #[test]
    fn channel_packing_matches_readback_layout() {
        let encoded = encode_mm(-12.345);
        let bytes = to_rgba8(encoded, 255);
        let pixel = from_rgba8(bytes);
        assert_eq!(pixel & 0x00FF_FFFF, encoded);
        assert_eq!(pixel >> 24, 255);
        assert_eq!(from_rgba8([0x12, 0x34, 0x56, 0x00]), 0x0012_3456);
    }

    #[test]
    fn axis_indices_round_trip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_index(axis.index()), Some(axis));
        }
        assert_eq!(Axis::from_index(3), None);
        assert_eq!(Axis::Z.component(DVec3::new(1.0, 2.0, 3.0)), 3.0);
    }
}
