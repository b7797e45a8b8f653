//! Conversion between raw PCM sample buffer encodings.
//!
//! Audio I/O code moves samples between a device or file's physical wire
//! format and a normalized internal representation (`f32` in roughly
//! `[-1.0, 1.0]`). This crate converts between those physical encodings:
//! integer widths of 8/16/24/32 bits (signed or offset-binary), 32-bit IEEE
//! float, big or little endian byte order, and interleaved or per-channel
//! buffers. It never allocates or owns sample storage; everything operates
//! on caller-supplied slices in a single deterministic pass.
//!
//! Statically known formats compose a [`Cursor`] or [`CursorMut`] from a
//! codec, a byte order and a layout, monomorphizing to branch-free
//! per-sample reads and writes. Formats only known at runtime go through
//! [`convert::DataFormat`] tags and [`convert::new_converter`], or the batch
//! helpers in [`convert`]:
//!
//! ```
//! let wire = [0x00, 0x40, 0x00, 0xc0]; // two int16le samples
//! let mut samples = [0.0f32; 2];
//! pcm_data::convert::convert_int16_le_to_float(&wire, &mut samples, 2).unwrap();
//! assert_eq!(samples, [0.5, -0.5]);
//! ```

pub mod codec;
pub mod convert;
pub mod cursor;
pub mod endian;
pub mod layout;

pub use codec::{Float32, Int16, Int24, Int32, Int8, SampleCodec, UInt8};
pub use convert::{new_converter, Convert, ConvertError, DataFormat};
pub use cursor::{convert_in_place, Cursor, CursorMut};
pub use endian::{BigEndian, ByteOrder, LittleEndian, NativeEndian};
pub use layout::{Interleaved, Layout, NonInterleaved};
