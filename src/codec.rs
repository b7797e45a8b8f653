//! The numeric sample encodings.
//!
//! Each codec knows how to read and write one sample of its physical format
//! as either a normalized `f32` or as a canonical 32-bit integer. The
//! canonical integer range is the full signed 32-bit range regardless of the
//! format's native width: narrower formats are left-shifted so their sign bit
//! lines up with bit 31 (an 8-bit sample shifts up by 24, a 24-bit sample by
//! 8, and so on). Both representations are interconvertible for every codec.

use crate::endian::ByteOrder;

/// A physical sample encoding.
///
/// All methods operate on byte slices supplied by a cursor; the codec itself
/// holds no data. Integer writes round half away from zero and clip the
/// scaled value to `±MAX_VALUE`, never wrapping.
pub trait SampleCodec {
    /// Size of one sample in bytes.
    const BYTES: usize;

    /// The format's signed peak on its native scale, e.g. `0x7fff` for 16-bit.
    const MAX_VALUE: i32;

    /// Smallest nonzero step representable by this format, expressed on the
    /// canonical 32-bit scale.
    const RESOLUTION: i32;

    const IS_FLOAT: bool;

    /// Short lowercase name, e.g. `"signed16"`.
    const NAME: &'static str;

    /// Decodes one sample to a normalized float in `[-1.0, 1.0]`.
    /// Float formats return the stored value unmodified.
    fn read_float<E: ByteOrder>(bytes: &[u8]) -> f32;

    /// Encodes a normalized float. Integer formats scale then clip; float
    /// formats store the value unmodified.
    fn write_float<E: ByteOrder>(bytes: &mut [u8], value: f32);

    /// Decodes one sample to the canonical 32-bit integer range.
    fn read_int32<E: ByteOrder>(bytes: &[u8]) -> i32;

    /// Encodes a canonical 32-bit integer, discarding the low bits that the
    /// format cannot represent.
    fn write_int32<E: ByteOrder>(bytes: &mut [u8], value: i32);

    /// Writes one silent sample. This is zero for signed and float formats,
    /// mid-scale for offset-binary formats.
    fn clear(bytes: &mut [u8]);
}

/// Scales a normalized float to an integer format's native range, rounding
/// half away from zero, then clips to the format's signed peak.
fn scale_to_int(value: f32, max_value: i32) -> i32 {
    let scaled = (value as f64 * (1.0 + max_value as f64)).round() as i64;
    scaled.clamp(-(max_value as i64), max_value as i64) as i32
}

fn int_to_float(raw: i32, max_value: i32) -> f32 {
    (raw as f64 * (1.0 / (1.0 + max_value as f64))) as f32
}

/// 8-bit signed integer samples.
pub struct Int8;

impl SampleCodec for Int8 {
    const BYTES: usize = 1;
    const MAX_VALUE: i32 = 0x7f;
    const RESOLUTION: i32 = 1 << 24;
    const IS_FLOAT: bool = false;
    const NAME: &'static str = "signed8";

    fn read_float<E: ByteOrder>(bytes: &[u8]) -> f32 {
        int_to_float(bytes[0] as i8 as i32, Self::MAX_VALUE)
    }

    fn write_float<E: ByteOrder>(bytes: &mut [u8], value: f32) {
        bytes[0] = scale_to_int(value, Self::MAX_VALUE) as i8 as u8;
    }

    fn read_int32<E: ByteOrder>(bytes: &[u8]) -> i32 {
        (bytes[0] as i8 as i32) << 24
    }

    fn write_int32<E: ByteOrder>(bytes: &mut [u8], value: i32) {
        bytes[0] = (value >> 24) as i8 as u8;
    }

    fn clear(bytes: &mut [u8]) {
        bytes[0] = 0;
    }
}

/// 8-bit unsigned (offset-binary) samples: 128 is silence.
///
/// The scale factor is the signed peak `0x7f`, not `0xff`, paired with the
/// 128 bias. The asymmetry is deliberate and load-bearing for round-trip
/// precision against the other integer formats.
pub struct UInt8;

impl SampleCodec for UInt8 {
    const BYTES: usize = 1;
    const MAX_VALUE: i32 = 0x7f;
    const RESOLUTION: i32 = 1 << 24;
    const IS_FLOAT: bool = false;
    const NAME: &'static str = "unsigned8";

    fn read_float<E: ByteOrder>(bytes: &[u8]) -> f32 {
        int_to_float(bytes[0] as i32 - 128, Self::MAX_VALUE)
    }

    fn write_float<E: ByteOrder>(bytes: &mut [u8], value: f32) {
        let scaled = (value as f64 * (1.0 + Self::MAX_VALUE as f64)).round() as i64;
        bytes[0] = (128 + scaled).clamp(0, 255) as u8;
    }

    fn read_int32<E: ByteOrder>(bytes: &[u8]) -> i32 {
        (bytes[0] as i32 - 128) << 24
    }

    fn write_int32<E: ByteOrder>(bytes: &mut [u8], value: i32) {
        bytes[0] = (128 + (value >> 24)) as u8;
    }

    fn clear(bytes: &mut [u8]) {
        bytes[0] = 128;
    }
}

/// 16-bit signed integer samples.
pub struct Int16;

impl SampleCodec for Int16 {
    const BYTES: usize = 2;
    const MAX_VALUE: i32 = 0x7fff;
    const RESOLUTION: i32 = 1 << 16;
    const IS_FLOAT: bool = false;
    const NAME: &'static str = "signed16";

    fn read_float<E: ByteOrder>(bytes: &[u8]) -> f32 {
        int_to_float(E::read_u16(bytes) as i16 as i32, Self::MAX_VALUE)
    }

    fn write_float<E: ByteOrder>(bytes: &mut [u8], value: f32) {
        E::write_u16(bytes, scale_to_int(value, Self::MAX_VALUE) as u16);
    }

    fn read_int32<E: ByteOrder>(bytes: &[u8]) -> i32 {
        (E::read_u16(bytes) as i16 as i32) << 16
    }

    fn write_int32<E: ByteOrder>(bytes: &mut [u8], value: i32) {
        E::write_u16(bytes, (value >> 16) as u16);
    }

    fn clear(bytes: &mut [u8]) {
        bytes[..2].fill(0);
    }
}

/// 24-bit signed integer samples, packed in 3 bytes.
pub struct Int24;

impl SampleCodec for Int24 {
    const BYTES: usize = 3;
    const MAX_VALUE: i32 = 0x7fffff;
    const RESOLUTION: i32 = 1 << 8;
    const IS_FLOAT: bool = false;
    const NAME: &'static str = "signed24";

    fn read_float<E: ByteOrder>(bytes: &[u8]) -> f32 {
        int_to_float(E::read_i24(bytes), Self::MAX_VALUE)
    }

    fn write_float<E: ByteOrder>(bytes: &mut [u8], value: f32) {
        E::write_i24(bytes, scale_to_int(value, Self::MAX_VALUE));
    }

    fn read_int32<E: ByteOrder>(bytes: &[u8]) -> i32 {
        E::read_i24(bytes) << 8
    }

    fn write_int32<E: ByteOrder>(bytes: &mut [u8], value: i32) {
        E::write_i24(bytes, value >> 8);
    }

    fn clear(bytes: &mut [u8]) {
        bytes[..3].fill(0);
    }
}

/// 32-bit signed integer samples.
pub struct Int32;

impl SampleCodec for Int32 {
    const BYTES: usize = 4;
    const MAX_VALUE: i32 = 0x7fffffff;
    const RESOLUTION: i32 = 1;
    const IS_FLOAT: bool = false;
    const NAME: &'static str = "signed32";

    fn read_float<E: ByteOrder>(bytes: &[u8]) -> f32 {
        int_to_float(E::read_u32(bytes) as i32, Self::MAX_VALUE)
    }

    fn write_float<E: ByteOrder>(bytes: &mut [u8], value: f32) {
        E::write_u32(bytes, scale_to_int(value, Self::MAX_VALUE) as u32);
    }

    fn read_int32<E: ByteOrder>(bytes: &[u8]) -> i32 {
        E::read_u32(bytes) as i32
    }

    fn write_int32<E: ByteOrder>(bytes: &mut [u8], value: i32) {
        E::write_u32(bytes, value as u32);
    }

    fn clear(bytes: &mut [u8]) {
        bytes[..4].fill(0);
    }
}

/// 32-bit IEEE float samples.
///
/// Reads and writes store the float unmodified; values outside `[-1.0, 1.0]`
/// are only clipped when converting to the canonical integer range.
pub struct Float32;

impl SampleCodec for Float32 {
    const BYTES: usize = 4;
    const MAX_VALUE: i32 = 0x7fffffff;
    const RESOLUTION: i32 = 1 << 8;
    const IS_FLOAT: bool = true;
    const NAME: &'static str = "float32";

    fn read_float<E: ByteOrder>(bytes: &[u8]) -> f32 {
        f32::from_bits(E::read_u32(bytes))
    }

    fn write_float<E: ByteOrder>(bytes: &mut [u8], value: f32) {
        E::write_u32(bytes, value.to_bits());
    }

    fn read_int32<E: ByteOrder>(bytes: &[u8]) -> i32 {
        let value = Self::read_float::<E>(bytes).clamp(-1.0, 1.0);
        (value as f64 * (1.0 + Self::MAX_VALUE as f64)).round() as i32
    }

    fn write_int32<E: ByteOrder>(bytes: &mut [u8], value: i32) {
        let scale = 1.0 / (1.0 + Self::MAX_VALUE as f64);
        Self::write_float::<E>(bytes, (value as f64 * scale) as f32);
    }

    fn clear(bytes: &mut [u8]) {
        bytes[..4].fill(0);
    }
}
