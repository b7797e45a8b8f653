//! Batch conversion entry points for the common cases: normalized `f32`
//! buffers to and from the packed wire formats, plus interleave and
//! deinterleave. All functions are stateless single passes over
//! caller-supplied memory and safe to call concurrently on disjoint buffers.

use bytemuck::must_cast_slice;

use crate::codec::{Float32, Int16, Int24, Int32, SampleCodec};
use crate::endian::{BigEndian, ByteOrder, LittleEndian};

use super::{ConvertError, DataFormat};

/// Encodes normalized floats into packed bytes, one sample at the start of
/// each `bytes_per_sample`-wide slot. `bytes_per_sample` is normally the
/// codec's native width; pass something larger for samples packed inside a
/// wider word.
fn encode_packed<F: SampleCodec, E: ByteOrder>(
    source: &[f32],
    dest: &mut [u8],
    bytes_per_sample: usize,
) -> Result<(), ConvertError> {
    assert!(
        bytes_per_sample >= F::BYTES,
        "{} needs at least {} bytes per sample",
        F::NAME,
        F::BYTES
    );

    let need = source.len() * bytes_per_sample;
    if dest.len() < need {
        return Err(ConvertError::DestTooSmall {
            need,
            got: dest.len(),
        });
    }

    for (slot, sample) in dest[..need].chunks_exact_mut(bytes_per_sample).zip(source) {
        F::write_float::<E>(slot, *sample);
    }

    Ok(())
}

/// Decodes packed bytes into normalized floats, reading one sample from the
/// start of each `bytes_per_sample`-wide slot.
fn decode_packed<F: SampleCodec, E: ByteOrder>(
    source: &[u8],
    dest: &mut [f32],
    bytes_per_sample: usize,
) -> Result<(), ConvertError> {
    assert!(
        bytes_per_sample >= F::BYTES,
        "{} needs at least {} bytes per sample",
        F::NAME,
        F::BYTES
    );

    let need = dest.len() * bytes_per_sample;
    if source.len() < need {
        return Err(ConvertError::SourceTooSmall {
            need,
            got: source.len(),
        });
    }

    for (sample, slot) in dest.iter_mut().zip(source[..need].chunks_exact(bytes_per_sample)) {
        *sample = F::read_float::<E>(slot);
    }

    Ok(())
}

macro_rules! float_to_format_fns {
    ($($to:ident, $from:ident, $codec:ty, $order:ty;)*) => {
        $(
            pub fn $to(
                source: &[f32],
                dest: &mut [u8],
                bytes_per_sample: usize,
            ) -> Result<(), ConvertError> {
                encode_packed::<$codec, $order>(source, dest, bytes_per_sample)
            }

            pub fn $from(
                source: &[u8],
                dest: &mut [f32],
                bytes_per_sample: usize,
            ) -> Result<(), ConvertError> {
                decode_packed::<$codec, $order>(source, dest, bytes_per_sample)
            }
        )*
    };
}

float_to_format_fns! {
    convert_float_to_int16_le, convert_int16_le_to_float, Int16, LittleEndian;
    convert_float_to_int16_be, convert_int16_be_to_float, Int16, BigEndian;
    convert_float_to_int24_le, convert_int24_le_to_float, Int24, LittleEndian;
    convert_float_to_int24_be, convert_int24_be_to_float, Int24, BigEndian;
    convert_float_to_int32_le, convert_int32_le_to_float, Int32, LittleEndian;
    convert_float_to_int32_be, convert_int32_be_to_float, Int32, BigEndian;
    convert_float_to_float32_le, convert_float32_le_to_float, Float32, LittleEndian;
    convert_float_to_float32_be, convert_float32_be_to_float, Float32, BigEndian;
}

/// Encodes normalized floats to the format named by a runtime tag, natively
/// packed. Native-order float destinations collapse to a byte copy.
pub fn convert_float_to_format(
    format: DataFormat,
    source: &[f32],
    dest: &mut [u8],
) -> Result<(), ConvertError> {
    if format == DataFormat::native_float() {
        let bytes: &[u8] = must_cast_slice(source);
        if dest.len() < bytes.len() {
            return Err(ConvertError::DestTooSmall {
                need: bytes.len(),
                got: dest.len(),
            });
        }
        dest[..bytes.len()].copy_from_slice(bytes);
        return Ok(());
    }

    let width = format.bytes_per_sample();
    match format {
        DataFormat::Int16Le => encode_packed::<Int16, LittleEndian>(source, dest, width),
        DataFormat::Int16Be => encode_packed::<Int16, BigEndian>(source, dest, width),
        DataFormat::Int24Le => encode_packed::<Int24, LittleEndian>(source, dest, width),
        DataFormat::Int24Be => encode_packed::<Int24, BigEndian>(source, dest, width),
        DataFormat::Int32Le => encode_packed::<Int32, LittleEndian>(source, dest, width),
        DataFormat::Int32Be => encode_packed::<Int32, BigEndian>(source, dest, width),
        DataFormat::Float32Le => encode_packed::<Float32, LittleEndian>(source, dest, width),
        DataFormat::Float32Be => encode_packed::<Float32, BigEndian>(source, dest, width),
    }
}

/// Decodes natively packed samples in the format named by a runtime tag into
/// normalized floats. Aligned native-order float sources collapse to a byte
/// copy.
pub fn convert_format_to_float(
    format: DataFormat,
    source: &[u8],
    dest: &mut [f32],
) -> Result<(), ConvertError> {
    if format == DataFormat::native_float() {
        let need = dest.len() * 4;
        if source.len() < need {
            return Err(ConvertError::SourceTooSmall {
                need,
                got: source.len(),
            });
        }
        // an unaligned source falls through to the generic path
        if let Ok(samples) = bytemuck::try_cast_slice::<u8, f32>(&source[..need]) {
            dest.copy_from_slice(samples);
            return Ok(());
        }
    }

    let width = format.bytes_per_sample();
    match format {
        DataFormat::Int16Le => decode_packed::<Int16, LittleEndian>(source, dest, width),
        DataFormat::Int16Be => decode_packed::<Int16, BigEndian>(source, dest, width),
        DataFormat::Int24Le => decode_packed::<Int24, LittleEndian>(source, dest, width),
        DataFormat::Int24Be => decode_packed::<Int24, BigEndian>(source, dest, width),
        DataFormat::Int32Le => decode_packed::<Int32, LittleEndian>(source, dest, width),
        DataFormat::Int32Be => decode_packed::<Int32, BigEndian>(source, dest, width),
        DataFormat::Float32Le => decode_packed::<Float32, LittleEndian>(source, dest, width),
        DataFormat::Float32Be => decode_packed::<Float32, BigEndian>(source, dest, width),
    }
}

/// Interleaves per-channel buffers round-robin into `dest`:
/// `dest[frame * channels + channel] = source[channel][frame]`.
pub fn interleave_samples(
    source: &[&[f32]],
    dest: &mut [f32],
    count: usize,
) -> Result<(), ConvertError> {
    let channels = source.len();
    let need = count * channels;
    if dest.len() < need {
        return Err(ConvertError::DestTooSmall {
            need,
            got: dest.len(),
        });
    }

    for (channel, samples) in source.iter().enumerate() {
        if samples.len() < count {
            return Err(ConvertError::ChannelTooShort {
                need: count,
                got: samples.len(),
            });
        }
        for (frame, sample) in samples[..count].iter().enumerate() {
            dest[frame * channels + channel] = *sample;
        }
    }

    Ok(())
}

/// Splits an interleaved buffer into per-channel buffers; the exact inverse
/// of [`interleave_samples`] for any channel count >= 1 and count >= 0.
pub fn deinterleave_samples(
    source: &[f32],
    dest: &mut [&mut [f32]],
    count: usize,
) -> Result<(), ConvertError> {
    let channels = dest.len();
    let need = count * channels;
    if source.len() < need {
        return Err(ConvertError::SourceTooSmall {
            need,
            got: source.len(),
        });
    }

    for (channel, samples) in dest.iter_mut().enumerate() {
        if samples.len() < count {
            return Err(ConvertError::ChannelTooShort {
                need: count,
                got: samples.len(),
            });
        }
        for (frame, sample) in samples[..count].iter_mut().enumerate() {
            *sample = source[frame * channels + channel];
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_slots_leave_padding_untouched() {
        // int16 samples packed in 4-byte slots
        let source = [0.5f32, -0.5];
        let mut dest = [0xaau8; 8];
        convert_float_to_int16_le(&source, &mut dest, 4).unwrap();

        assert_eq!(LittleEndian::read_u16(&dest[0..]) as i16, 0x4000);
        assert_eq!(dest[2], 0xaa);
        assert_eq!(dest[3], 0xaa);
        assert_eq!(LittleEndian::read_u16(&dest[4..]) as i16, -0x4000);

        let mut back = [0.0f32; 2];
        convert_int16_le_to_float(&dest, &mut back, 4).unwrap();
        assert_eq!(back, source);
    }

    #[test]
    fn clipping_hits_format_peak() {
        let source = [1.5f32, -1.5];
        let mut dest = [0u8; 6];
        convert_float_to_int24_le(&source, &mut dest, 3).unwrap();
        assert_eq!(LittleEndian::read_i24(&dest[0..]), 0x7fffff);
        assert_eq!(LittleEndian::read_i24(&dest[3..]), -0x7fffff);
    }

    #[test]
    fn short_destination_is_an_error() {
        let source = [0.0f32; 4];
        let mut dest = [0u8; 7];
        assert!(matches!(
            convert_float_to_int16_le(&source, &mut dest, 2),
            Err(ConvertError::DestTooSmall { need: 8, got: 7 })
        ));
    }

    #[test]
    fn format_dispatch_matches_direct_calls() {
        let source = [0.25f32, -1.0, 1.0, 0.0];
        for format in DataFormat::ALL {
            let mut via_tag = [0u8; 16];
            convert_float_to_format(format, &source, &mut via_tag).unwrap();

            let mut back = [0.0f32; 4];
            convert_format_to_float(format, &via_tag, &mut back).unwrap();

            let step = if format.is_float() {
                0.0
            } else {
                1.0 / (1u64 << (format.bytes_per_sample() * 8 - 1)) as f64
            };
            for (seen, expected) in back.iter().zip(&source) {
                assert!(
                    (*seen as f64 - *expected as f64).abs() <= step,
                    "{format}: {expected} -> {seen}"
                );
            }
        }
    }

    #[test]
    fn interleave_is_round_robin() {
        let left = [1.0f32, 2.0, 3.0];
        let right = [4.0f32, 5.0, 6.0];
        let mut dest = [0.0f32; 6];
        interleave_samples(&[&left, &right], &mut dest, 3).unwrap();
        assert_eq!(dest, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn deinterleave_inverts_interleave() {
        let interleaved = [1.0f32, 4.0, 2.0, 5.0, 3.0, 6.0];
        let mut left = [0.0f32; 3];
        let mut right = [0.0f32; 3];
        deinterleave_samples(&interleaved, &mut [&mut left, &mut right], 3).unwrap();
        assert_eq!(left, [1.0, 2.0, 3.0]);
        assert_eq!(right, [4.0, 5.0, 6.0]);

        let mut again = [0.0f32; 6];
        interleave_samples(&[&left, &right], &mut again, 3).unwrap();
        assert_eq!(again, interleaved);
    }

    #[test]
    fn zero_count_is_a_no_op() {
        let mut dest = [0.0f32; 0];
        interleave_samples(&[], &mut dest, 0).unwrap();

        let mut channels: [&mut [f32]; 0] = [];
        deinterleave_samples(&[], &mut channels, 0).unwrap();
    }
}
