use pcm_data::convert::{self, DataFormat};
use pcm_data::{
    convert_in_place, new_converter, BigEndian, Cursor, CursorMut, Float32, Int16, Int24, Int32,
    LittleEndian,
};

#[test]
fn full_scale_float_clips_to_int24_peak() {
    let source = [1.0f32];
    let mut dest = [0u8; 3];
    convert::convert_float_to_int24_le(&source, &mut dest, 3).unwrap();
    assert_eq!(dest, [0xff, 0xff, 0x7f]);
}

#[test]
fn endianness_swaps_bytes_but_not_values() {
    // for every format: the LE and BE encodings of the same value differ in
    // raw bytes but decode identically under their own byte order
    let value = 0.375f32;
    for bits in [16usize, 24, 32] {
        let (le, be) = match bits {
            16 => (DataFormat::Int16Le, DataFormat::Int16Be),
            24 => (DataFormat::Int24Le, DataFormat::Int24Be),
            _ => (DataFormat::Int32Le, DataFormat::Int32Be),
        };

        let mut le_bytes = [0u8; 4];
        let mut be_bytes = [0u8; 4];
        convert::convert_float_to_format(le, &[value], &mut le_bytes[..bits / 8]).unwrap();
        convert::convert_float_to_format(be, &[value], &mut be_bytes[..bits / 8]).unwrap();

        assert_ne!(le_bytes, be_bytes, "{le} vs {be}");

        let mut from_le = [0.0f32];
        let mut from_be = [0.0f32];
        convert::convert_format_to_float(le, &le_bytes[..bits / 8], &mut from_le).unwrap();
        convert::convert_format_to_float(be, &be_bytes[..bits / 8], &mut from_be).unwrap();
        assert_eq!(from_le, from_be);
        assert_eq!(from_le[0], value);
    }
}

#[test]
fn float32_byte_order_mismatch_is_detectable() {
    // 1.0f32 little endian on the wire
    let wire = 1.0f32.to_le_bytes();

    let le = Cursor::<Float32, LittleEndian, _>::new(&wire);
    let be = Cursor::<Float32, BigEndian, _>::new(&wire);
    assert_eq!(le.get_as_float(), 1.0);
    assert_ne!(be.get_as_float(), 1.0);

    // LE-write, BE-read, BE-write recovers the original byte pattern
    let swapped = be.get_as_float();
    let mut recovered = [0u8; 4];
    CursorMut::<Float32, BigEndian, _>::new(&mut recovered).set_as_float(swapped);
    assert_eq!(recovered, wire);
}

#[test]
fn runtime_converters_round_trip_through_every_format() {
    let samples = [0.0f32, 0.25, -0.25, 0.9375, -1.0, 0.0078125];

    let mut float_bytes = [0u8; 24];
    convert::convert_float_to_format(DataFormat::native_float(), &samples, &mut float_bytes)
        .unwrap();

    for format in DataFormat::ALL {
        let to_wire = new_converter(DataFormat::native_float(), format, 1, 1);
        let to_float = new_converter(format, DataFormat::native_float(), 1, 1);

        let mut wire = [0u8; 24];
        to_wire.convert(&mut wire, &float_bytes, 6).unwrap();

        let mut back_bytes = [0u8; 24];
        to_float.convert(&mut back_bytes, &wire, 6).unwrap();

        let mut back = [0.0f32; 6];
        convert::convert_format_to_float(DataFormat::native_float(), &back_bytes, &mut back)
            .unwrap();

        let step = 1.0 / (1u64 << (format.bytes_per_sample() * 8 - 1)) as f64;
        for (seen, expected) in back.iter().zip(&samples) {
            assert!(
                (*seen as f64 - *expected as f64).abs() <= step,
                "{format}: {expected} -> {seen}"
            );
        }
    }
}

#[test]
fn interleaved_stream_deinterleaves_exactly() {
    // simulate a stereo capture: per-channel buffers -> interleaved wire ->
    // int16 -> back to floats -> split channels
    let left: Vec<f32> = (0..64).map(|i| (i as f32 / 64.0) - 0.5).collect();
    let right: Vec<f32> = left.iter().map(|s| -s).collect();

    let mut interleaved = vec![0.0f32; 128];
    convert::interleave_samples(&[&left, &right], &mut interleaved, 64).unwrap();

    let mut wire = vec![0u8; 256];
    convert::convert_float_to_int16_le(&interleaved, &mut wire, 2).unwrap();

    let mut decoded = vec![0.0f32; 128];
    convert::convert_int16_le_to_float(&wire, &mut decoded, 2).unwrap();

    let mut left_out = vec![0.0f32; 64];
    let mut right_out = vec![0.0f32; 64];
    convert::deinterleave_samples(&decoded, &mut [&mut left_out, &mut right_out], 64).unwrap();

    let step = 1.0 / 32768.0;
    for index in 0..64 {
        assert!((left_out[index] - left[index]).abs() <= step);
        assert!((right_out[index] - right[index]).abs() <= step);
    }
}

#[test]
fn widening_in_place_needs_no_scratch_buffer() {
    // a buffer of int16 wire data widened to int32 within the same storage,
    // as a driver would after reading into the front of a larger buffer
    let samples: Vec<i16> = (0..100).map(|i| (i * 327) as i16).collect();

    let mut buffer = vec![0u8; 400];
    for (index, sample) in samples.iter().enumerate() {
        buffer[index * 2..index * 2 + 2].copy_from_slice(&sample.to_le_bytes());
    }

    convert_in_place::<Int16, LittleEndian, Int32, LittleEndian>(&mut buffer, 100);

    let source = Cursor::<Int32, LittleEndian, _>::new(&buffer);
    let mut cursor = source;
    for sample in &samples {
        assert_eq!(cursor.get_as_int32(), (*sample as i32) << 16);
        cursor.advance();
    }
}

#[test]
fn sub_channel_conversion_between_different_channel_counts() {
    // extract the third channel of a 3-channel int24be stream into the left
    // half of a stereo float32le buffer
    let mut wire = [0u8; 18]; // 2 frames x 3 channels x 3 bytes
    let mut writer = CursorMut::<Int24, BigEndian, _>::interleaved(&mut wire[6..], 3);
    writer.set_as_float(0.5);
    writer.advance();
    writer.set_as_float(-0.5);

    let mut dest = [0u8; 16]; // 2 frames x 2 channels x 4 bytes
    let converter = new_converter(DataFormat::Int24Be, DataFormat::Float32Le, 3, 2);
    converter.convert_sub_channels(&mut dest, 0, &wire, 2, 2).unwrap();

    let left = Cursor::<Float32, LittleEndian, _>::interleaved(&dest, 2);
    assert_eq!(left.get_as_float(), 0.5);
    let mut left = left;
    left.advance();
    assert_eq!(left.get_as_float(), -0.5);
}
