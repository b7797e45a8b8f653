//! Runtime-dispatched format conversion.
//!
//! Code that only learns a buffer's physical format at runtime (a file
//! header field, a stream negotiation) selects it with a [`DataFormat`] tag.
//! [`new_converter`] turns a pair of tags into a boxed [`Convert`]
//! implementation bound to concrete codec and byte-order types, so dispatch
//! happens once per call rather than once per sample. Construct a converter
//! once per stream and reuse it; it holds no per-call state.

pub mod batch;

pub use batch::{
    convert_float32_be_to_float, convert_float32_le_to_float, convert_float_to_float32_be,
    convert_float_to_float32_le, convert_float_to_format, convert_float_to_int16_be,
    convert_float_to_int16_le, convert_float_to_int24_be, convert_float_to_int24_le,
    convert_float_to_int32_be, convert_float_to_int32_le, convert_format_to_float,
    convert_int16_be_to_float, convert_int16_le_to_float, convert_int24_be_to_float,
    convert_int24_le_to_float, convert_int32_be_to_float, convert_int32_le_to_float,
    deinterleave_samples, interleave_samples,
};

use core::fmt::{self, Display};
use core::marker::PhantomData;
use core::str::FromStr;

use thiserror::Error;

use crate::codec::{Float32, Int16, Int24, Int32, SampleCodec};
use crate::cursor::{Cursor, CursorMut};
use crate::endian::{BigEndian, ByteOrder, LittleEndian};

/// Sample format of a raw audio buffer, as named by file headers and wire
/// protocols. The 8-bit codecs are compile-time only and have no tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Int16Le,
    Int16Be,
    Int24Le,
    Int24Be,
    Int32Le,
    Int32Be,
    Float32Le,
    Float32Be,
}

impl DataFormat {
    pub const ALL: [DataFormat; 8] = [
        DataFormat::Int16Le,
        DataFormat::Int16Be,
        DataFormat::Int24Le,
        DataFormat::Int24Be,
        DataFormat::Int32Le,
        DataFormat::Int32Be,
        DataFormat::Float32Le,
        DataFormat::Float32Be,
    ];

    pub fn bytes_per_sample(self) -> usize {
        match self {
            DataFormat::Int16Le | DataFormat::Int16Be => 2,
            DataFormat::Int24Le | DataFormat::Int24Be => 3,
            DataFormat::Int32Le
            | DataFormat::Int32Be
            | DataFormat::Float32Le
            | DataFormat::Float32Be => 4,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DataFormat::Float32Le | DataFormat::Float32Be)
    }

    pub fn is_big_endian(self) -> bool {
        matches!(
            self,
            DataFormat::Int16Be | DataFormat::Int24Be | DataFormat::Int32Be | DataFormat::Float32Be
        )
    }

    /// The tag for 32-bit float samples in the host's byte order.
    pub fn native_float() -> DataFormat {
        if cfg!(target_endian = "big") {
            DataFormat::Float32Be
        } else {
            DataFormat::Float32Le
        }
    }

    fn name(self) -> &'static str {
        match self {
            DataFormat::Int16Le => "int16le",
            DataFormat::Int16Be => "int16be",
            DataFormat::Int24Le => "int24le",
            DataFormat::Int24Be => "int24be",
            DataFormat::Int32Le => "int32le",
            DataFormat::Int32Be => "int32be",
            DataFormat::Float32Le => "float32le",
            DataFormat::Float32Be => "float32be",
        }
    }
}

impl Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown sample format: {0:?}")]
pub struct UnknownFormat(pub String);

impl FromStr for DataFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("source buffer too small: need at least {need}, got {got}")]
    SourceTooSmall { need: usize, got: usize },
    #[error("destination buffer too small: need at least {need}, got {got}")]
    DestTooSmall { need: usize, got: usize },
    #[error("sub-channel {channel} out of range for {channels} interleaved channels")]
    BadSubChannel { channel: usize, channels: usize },
    #[error("channel buffer too short: need at least {need} samples, got {got}")]
    ChannelTooShort { need: usize, got: usize },
}

/// A type-erased sample format converter.
///
/// Implementations are bound to one (source format, destination format) pair
/// and a fixed channel count for each side, supplied at construction.
pub trait Convert: Display + Send {
    /// Converts `count` samples of the first sub-channel of `source` into
    /// the first sub-channel of `dest`.
    fn convert(&self, dest: &mut [u8], source: &[u8], count: usize) -> Result<(), ConvertError>;

    /// Converts `count` samples of one interleaved sub-channel of `source`
    /// into one interleaved sub-channel of `dest`. Sub-channel selection is
    /// a byte offset of `channel * bytes_per_sample` before the stride walk.
    fn convert_sub_channels(
        &self,
        dest: &mut [u8],
        dest_channel: usize,
        source: &[u8],
        source_channel: usize,
        count: usize,
    ) -> Result<(), ConvertError>;
}

/// Bytes spanned by `count` samples at one sample per `channels` frames.
fn span(count: usize, channels: usize, bytes: usize) -> usize {
    if count == 0 {
        0
    } else {
        (count - 1) * channels * bytes + bytes
    }
}

fn check_sub_channels(
    dest_len: usize,
    dest_channel: usize,
    dest_channels: usize,
    dest_bytes: usize,
    source_len: usize,
    source_channel: usize,
    source_channels: usize,
    source_bytes: usize,
    count: usize,
) -> Result<(), ConvertError> {
    if source_channel >= source_channels {
        return Err(ConvertError::BadSubChannel {
            channel: source_channel,
            channels: source_channels,
        });
    }
    if dest_channel >= dest_channels {
        return Err(ConvertError::BadSubChannel {
            channel: dest_channel,
            channels: dest_channels,
        });
    }

    let need = source_channel * source_bytes + span(count, source_channels, source_bytes);
    if source_len < need {
        return Err(ConvertError::SourceTooSmall {
            need,
            got: source_len,
        });
    }

    let need = dest_channel * dest_bytes + span(count, dest_channels, dest_bytes);
    if dest_len < need {
        return Err(ConvertError::DestTooSmall {
            need,
            got: dest_len,
        });
    }

    Ok(())
}

/// Converter between two concrete formats. Channel counts are part of its
/// identity and fixed at construction.
pub struct FormatConverter<SF, SE, DF, DE> {
    source_channels: usize,
    dest_channels: usize,
    _formats: PhantomData<fn(SF, SE, DF, DE)>,
}

impl<SF, SE, DF, DE> FormatConverter<SF, SE, DF, DE>
where
    SF: SampleCodec,
    SE: ByteOrder,
    DF: SampleCodec,
    DE: ByteOrder,
{
    pub fn new(source_channels: usize, dest_channels: usize) -> Self {
        assert!(source_channels >= 1 && dest_channels >= 1);
        FormatConverter {
            source_channels,
            dest_channels,
            _formats: PhantomData,
        }
    }
}

impl<SF, SE, DF, DE> Display for FormatConverter<SF, SE, DF, DE>
where
    SF: SampleCodec,
    SE: ByteOrder,
    DF: SampleCodec,
    DE: ByteOrder,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) -> {} ({})",
            SF::NAME,
            SE::NAME,
            DF::NAME,
            DE::NAME
        )
    }
}

impl<SF, SE, DF, DE> Convert for FormatConverter<SF, SE, DF, DE>
where
    SF: SampleCodec,
    SE: ByteOrder,
    DF: SampleCodec,
    DE: ByteOrder,
{
    fn convert(&self, dest: &mut [u8], source: &[u8], count: usize) -> Result<(), ConvertError> {
        self.convert_sub_channels(dest, 0, source, 0, count)
    }

    fn convert_sub_channels(
        &self,
        dest: &mut [u8],
        dest_channel: usize,
        source: &[u8],
        source_channel: usize,
        count: usize,
    ) -> Result<(), ConvertError> {
        check_sub_channels(
            dest.len(),
            dest_channel,
            self.dest_channels,
            DF::BYTES,
            source.len(),
            source_channel,
            self.source_channels,
            SF::BYTES,
            count,
        )?;

        if count == 0 {
            return Ok(());
        }

        let source = Cursor::<SF, SE, _>::interleaved(
            &source[source_channel * SF::BYTES..],
            self.source_channels,
        );
        let mut dest = CursorMut::<DF, DE, _>::interleaved(
            &mut dest[dest_channel * DF::BYTES..],
            self.dest_channels,
        );
        dest.convert_from(&source, count);
        Ok(())
    }
}

/// Same-format converter: a raw byte copy per sample, no numeric conversion.
struct CopyConverter<F, E> {
    source_channels: usize,
    dest_channels: usize,
    _format: PhantomData<fn(F, E)>,
}

impl<F: SampleCodec, E: ByteOrder> Display for CopyConverter<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) copy", F::NAME, E::NAME)
    }
}

impl<F: SampleCodec, E: ByteOrder> Convert for CopyConverter<F, E> {
    fn convert(&self, dest: &mut [u8], source: &[u8], count: usize) -> Result<(), ConvertError> {
        self.convert_sub_channels(dest, 0, source, 0, count)
    }

    fn convert_sub_channels(
        &self,
        dest: &mut [u8],
        dest_channel: usize,
        source: &[u8],
        source_channel: usize,
        count: usize,
    ) -> Result<(), ConvertError> {
        check_sub_channels(
            dest.len(),
            dest_channel,
            self.dest_channels,
            F::BYTES,
            source.len(),
            source_channel,
            self.source_channels,
            F::BYTES,
            count,
        )?;

        if count == 0 {
            return Ok(());
        }

        let source = Cursor::<F, E, _>::interleaved(
            &source[source_channel * F::BYTES..],
            self.source_channels,
        );
        let mut dest = CursorMut::<F, E, _>::interleaved(
            &mut dest[dest_channel * F::BYTES..],
            self.dest_channels,
        );
        dest.copy_from(&source, count);
        Ok(())
    }
}

/// Creates a boxed converter for a pair of runtime format tags.
///
/// `source_channels` and `dest_channels` give the interleaved channel count
/// of each buffer (1 for non-interleaved data). When both tags are equal the
/// converter degenerates to a per-sample byte copy.
pub fn new_converter(
    source: DataFormat,
    dest: DataFormat,
    source_channels: usize,
    dest_channels: usize,
) -> Box<dyn Convert> {
    let converter = if source == dest {
        new_copy_converter(source, source_channels, dest_channels)
    } else {
        match source {
            DataFormat::Int16Le => {
                with_source::<Int16, LittleEndian>(dest, source_channels, dest_channels)
            }
            DataFormat::Int16Be => {
                with_source::<Int16, BigEndian>(dest, source_channels, dest_channels)
            }
            DataFormat::Int24Le => {
                with_source::<Int24, LittleEndian>(dest, source_channels, dest_channels)
            }
            DataFormat::Int24Be => {
                with_source::<Int24, BigEndian>(dest, source_channels, dest_channels)
            }
            DataFormat::Int32Le => {
                with_source::<Int32, LittleEndian>(dest, source_channels, dest_channels)
            }
            DataFormat::Int32Be => {
                with_source::<Int32, BigEndian>(dest, source_channels, dest_channels)
            }
            DataFormat::Float32Le => {
                with_source::<Float32, LittleEndian>(dest, source_channels, dest_channels)
            }
            DataFormat::Float32Be => {
                with_source::<Float32, BigEndian>(dest, source_channels, dest_channels)
            }
        }
    };

    log::debug!("instantiated converter: {converter}");
    converter
}

fn with_source<SF, SE>(
    dest: DataFormat,
    source_channels: usize,
    dest_channels: usize,
) -> Box<dyn Convert>
where
    SF: SampleCodec + 'static,
    SE: ByteOrder + 'static,
{
    match dest {
        DataFormat::Int16Le => Box::new(FormatConverter::<SF, SE, Int16, LittleEndian>::new(
            source_channels,
            dest_channels,
        )),
        DataFormat::Int16Be => Box::new(FormatConverter::<SF, SE, Int16, BigEndian>::new(
            source_channels,
            dest_channels,
        )),
        DataFormat::Int24Le => Box::new(FormatConverter::<SF, SE, Int24, LittleEndian>::new(
            source_channels,
            dest_channels,
        )),
        DataFormat::Int24Be => Box::new(FormatConverter::<SF, SE, Int24, BigEndian>::new(
            source_channels,
            dest_channels,
        )),
        DataFormat::Int32Le => Box::new(FormatConverter::<SF, SE, Int32, LittleEndian>::new(
            source_channels,
            dest_channels,
        )),
        DataFormat::Int32Be => Box::new(FormatConverter::<SF, SE, Int32, BigEndian>::new(
            source_channels,
            dest_channels,
        )),
        DataFormat::Float32Le => Box::new(FormatConverter::<SF, SE, Float32, LittleEndian>::new(
            source_channels,
            dest_channels,
        )),
        DataFormat::Float32Be => Box::new(FormatConverter::<SF, SE, Float32, BigEndian>::new(
            source_channels,
            dest_channels,
        )),
    }
}

fn new_copy_converter(
    format: DataFormat,
    source_channels: usize,
    dest_channels: usize,
) -> Box<dyn Convert> {
    fn copy<F: SampleCodec + 'static, E: ByteOrder + 'static>(
        source_channels: usize,
        dest_channels: usize,
    ) -> Box<dyn Convert> {
        assert!(source_channels >= 1 && dest_channels >= 1);
        Box::new(CopyConverter::<F, E> {
            source_channels,
            dest_channels,
            _format: PhantomData,
        })
    }

    match format {
        DataFormat::Int16Le => copy::<Int16, LittleEndian>(source_channels, dest_channels),
        DataFormat::Int16Be => copy::<Int16, BigEndian>(source_channels, dest_channels),
        DataFormat::Int24Le => copy::<Int24, LittleEndian>(source_channels, dest_channels),
        DataFormat::Int24Be => copy::<Int24, BigEndian>(source_channels, dest_channels),
        DataFormat::Int32Le => copy::<Int32, LittleEndian>(source_channels, dest_channels),
        DataFormat::Int32Be => copy::<Int32, BigEndian>(source_channels, dest_channels),
        DataFormat::Float32Le => copy::<Float32, LittleEndian>(source_channels, dest_channels),
        DataFormat::Float32Be => copy::<Float32, BigEndian>(source_channels, dest_channels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endian::LittleEndian as Le;

    #[test]
    fn format_tags_describe_themselves() {
        assert_eq!(DataFormat::Int24Be.bytes_per_sample(), 3);
        assert!(DataFormat::Int24Be.is_big_endian());
        assert!(!DataFormat::Int24Be.is_float());
        assert!(DataFormat::Float32Le.is_float());
        assert_eq!(DataFormat::Float32Le.to_string(), "float32le");
    }

    #[test]
    fn format_tags_parse_from_names() {
        for format in DataFormat::ALL {
            assert_eq!(format.to_string().parse::<DataFormat>().unwrap(), format);
        }
        assert!("pcm17".parse::<DataFormat>().is_err());
    }

    #[test]
    fn converter_maps_sub_channels() {
        // stereo int16 -> stereo float32, converting the right channel only
        let mut source = [0u8; 8];
        Le::write_u16(&mut source[0..], 0x7fff); // left
        Le::write_u16(&mut source[2..], 0x4000); // right
        Le::write_u16(&mut source[4..], 0x7fff);
        Le::write_u16(&mut source[6..], 0xc000u16); // -0x4000

        let mut dest = [0u8; 16];
        let converter = new_converter(DataFormat::Int16Le, DataFormat::Float32Le, 2, 2);
        converter
            .convert_sub_channels(&mut dest, 1, &source, 1, 2)
            .unwrap();

        assert_eq!(f32::from_bits(Le::read_u32(&dest[4..])), 0.5);
        assert_eq!(f32::from_bits(Le::read_u32(&dest[12..])), -0.5);
        // left channel slots untouched
        assert_eq!(Le::read_u32(&dest[0..]), 0);
        assert_eq!(Le::read_u32(&dest[8..]), 0);
    }

    #[test]
    fn converter_rejects_bad_sub_channel() {
        let converter = new_converter(DataFormat::Int16Le, DataFormat::Int16Be, 2, 2);
        let source = [0u8; 8];
        let mut dest = [0u8; 8];
        assert!(matches!(
            converter.convert_sub_channels(&mut dest, 2, &source, 0, 2),
            Err(ConvertError::BadSubChannel { channel: 2, channels: 2 })
        ));
    }

    #[test]
    fn converter_rejects_short_buffers() {
        let converter = new_converter(DataFormat::Int16Le, DataFormat::Int32Le, 1, 1);
        let source = [0u8; 8];
        let mut dest = [0u8; 8];
        assert!(matches!(
            converter.convert(&mut dest, &source, 4),
            Err(ConvertError::DestTooSmall { need: 16, got: 8 })
        ));
    }

    #[test]
    fn same_format_uses_raw_copy() {
        let source = [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut dest = [0u8; 6];
        let converter = new_converter(DataFormat::Int24Be, DataFormat::Int24Be, 1, 1);
        assert_eq!(converter.to_string(), "signed24 (big endian) copy");
        converter.convert(&mut dest, &source, 2).unwrap();
        assert_eq!(dest, source);
    }

    #[test]
    fn converter_descriptions_name_both_sides() {
        let converter = new_converter(DataFormat::Int16Le, DataFormat::Float32Be, 1, 1);
        assert_eq!(
            converter.to_string(),
            "signed16 (little endian) -> float32 (big endian)"
        );
    }

    #[test]
    fn every_format_pair_converts_silence() {
        for source_format in DataFormat::ALL {
            for dest_format in DataFormat::ALL {
                let source = [0u8; 8];
                let mut dest = [0xaau8; 8];
                let count = 8 / source_format.bytes_per_sample().max(dest_format.bytes_per_sample());
                let converter = new_converter(source_format, dest_format, 1, 1);
                converter.convert(&mut dest, &source, count).unwrap();

                // integer or float zero encodes as all-zero bytes in every format
                let written = count * dest_format.bytes_per_sample();
                assert!(
                    dest[..written].iter().all(|byte| *byte == 0),
                    "{source_format} -> {dest_format}"
                );
            }
        }
    }
}
