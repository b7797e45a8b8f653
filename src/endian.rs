//! Byte-order strategies for multi-byte sample encodings.

/// Reads and writes the primitive widths used by the sample codecs,
/// including the packed 3-byte width that has no native integer type.
///
/// Implemented by [`BigEndian`] and [`LittleEndian`]. [`NativeEndian`] is an
/// alias for whichever of the two matches the host, so call sites can avoid
/// conditional compilation.
pub trait ByteOrder {
    const IS_BIG_ENDIAN: bool;

    /// Human readable name, e.g. `"little endian"`.
    const NAME: &'static str;

    fn read_u16(bytes: &[u8]) -> u16;
    fn write_u16(bytes: &mut [u8], value: u16);

    fn read_u32(bytes: &[u8]) -> u32;
    fn write_u32(bytes: &mut [u8], value: u32);

    /// Reads a sign-extended 24-bit integer from 3 bytes.
    fn read_i24(bytes: &[u8]) -> i32;

    /// Writes the low 24 bits of `value` to 3 bytes.
    fn write_i24(bytes: &mut [u8], value: i32);
}

pub struct LittleEndian;

impl ByteOrder for LittleEndian {
    const IS_BIG_ENDIAN: bool = false;
    const NAME: &'static str = "little endian";

    fn read_u16(bytes: &[u8]) -> u16 {
        // use try_into to turn a &[u8] (guaranteed len == width) into [u8; width]
        u16::from_le_bytes(bytes[..2].try_into().unwrap())
    }

    fn write_u16(bytes: &mut [u8], value: u16) {
        bytes[..2].copy_from_slice(&value.to_le_bytes());
    }

    fn read_u32(bytes: &[u8]) -> u32 {
        u32::from_le_bytes(bytes[..4].try_into().unwrap())
    }

    fn write_u32(bytes: &mut [u8], value: u32) {
        bytes[..4].copy_from_slice(&value.to_le_bytes());
    }

    fn read_i24(bytes: &[u8]) -> i32 {
        let raw = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]);
        (raw << 8) >> 8
    }

    fn write_i24(bytes: &mut [u8], value: i32) {
        bytes[..3].copy_from_slice(&value.to_le_bytes()[..3]);
    }
}

pub struct BigEndian;

impl ByteOrder for BigEndian {
    const IS_BIG_ENDIAN: bool = true;
    const NAME: &'static str = "big endian";

    fn read_u16(bytes: &[u8]) -> u16 {
        u16::from_be_bytes(bytes[..2].try_into().unwrap())
    }

    fn write_u16(bytes: &mut [u8], value: u16) {
        bytes[..2].copy_from_slice(&value.to_be_bytes());
    }

    fn read_u32(bytes: &[u8]) -> u32 {
        u32::from_be_bytes(bytes[..4].try_into().unwrap())
    }

    fn write_u32(bytes: &mut [u8], value: u32) {
        bytes[..4].copy_from_slice(&value.to_be_bytes());
    }

    fn read_i24(bytes: &[u8]) -> i32 {
        let raw = i32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
        (raw << 8) >> 8
    }

    fn write_i24(bytes: &mut [u8], value: i32) {
        bytes[..3].copy_from_slice(&value.to_be_bytes()[1..4]);
    }
}

/// The byte order of the host CPU.
#[cfg(target_endian = "little")]
pub type NativeEndian = LittleEndian;

/// The byte order of the host CPU.
#[cfg(target_endian = "big")]
pub type NativeEndian = BigEndian;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_round_trip_both_orders() {
        let mut bytes = [0u8; 2];

        LittleEndian::write_u16(&mut bytes, 0x1234);
        assert_eq!(bytes, [0x34, 0x12]);
        assert_eq!(LittleEndian::read_u16(&bytes), 0x1234);

        BigEndian::write_u16(&mut bytes, 0x1234);
        assert_eq!(bytes, [0x12, 0x34]);
        assert_eq!(BigEndian::read_u16(&bytes), 0x1234);
    }

    #[test]
    fn u32_byte_swap() {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, 0x3f800000);
        assert_eq!(BigEndian::read_u32(&bytes), 0x0000803f);
    }

    #[test]
    fn i24_sign_extends() {
        let mut bytes = [0u8; 3];

        LittleEndian::write_i24(&mut bytes, -1);
        assert_eq!(bytes, [0xff, 0xff, 0xff]);
        assert_eq!(LittleEndian::read_i24(&bytes), -1);

        BigEndian::write_i24(&mut bytes, -0x800000);
        assert_eq!(bytes, [0x80, 0x00, 0x00]);
        assert_eq!(BigEndian::read_i24(&bytes), -0x800000);

        LittleEndian::write_i24(&mut bytes, 0x7fffff);
        assert_eq!(bytes, [0xff, 0xff, 0x7f]);
        assert_eq!(LittleEndian::read_i24(&bytes), 0x7fffff);
    }

    #[test]
    fn i24_big_endian_byte_order() {
        let mut bytes = [0u8; 3];
        BigEndian::write_i24(&mut bytes, 0x123456);
        assert_eq!(bytes, [0x12, 0x34, 0x56]);
        assert_eq!(BigEndian::read_i24(&bytes), 0x123456);
        assert_eq!(LittleEndian::read_i24(&bytes), 0x563412);
    }
}
