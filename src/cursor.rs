//! Typed cursors over raw sample buffers.
//!
//! A cursor composes a [`SampleCodec`], a [`ByteOrder`] and a [`Layout`] into
//! a movable position inside a caller-owned byte buffer. [`Cursor`] borrows
//! the buffer immutably and can only read; [`CursorMut`] borrows it mutably
//! and adds the write operations, so writing through read-only data is a
//! type error rather than a runtime check. Cursors never own or allocate
//! sample storage.
//!
//! Positions are byte offsets into a bounds-checked slice. Stepping or
//! accessing past the end of the buffer is a contract violation and panics.

use core::marker::PhantomData;

use crate::codec::SampleCodec;
use crate::endian::ByteOrder;
use crate::layout::{Interleaved, Layout, NonInterleaved};

/// Read-only cursor over encoded sample data.
pub struct Cursor<'a, F, E, L> {
    data: &'a [u8],
    offset: usize,
    layout: L,
    _format: PhantomData<fn(F, E)>,
}

impl<F, E, L: Layout> Clone for Cursor<'_, F, E, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, E, L: Layout> Copy for Cursor<'_, F, E, L> {}

/// Mutable cursor over encoded sample data.
pub struct CursorMut<'a, F, E, L> {
    data: &'a mut [u8],
    offset: usize,
    layout: L,
    _format: PhantomData<fn(F, E)>,
}

impl<'a, F: SampleCodec, E: ByteOrder> Cursor<'a, F, E, NonInterleaved> {
    /// Creates a cursor over one channel's contiguous samples.
    pub fn new(data: &'a [u8]) -> Self {
        Cursor {
            data,
            offset: 0,
            layout: NonInterleaved,
            _format: PhantomData,
        }
    }
}

impl<'a, F: SampleCodec, E: ByteOrder> Cursor<'a, F, E, Interleaved> {
    /// Creates a cursor over one channel of an interleaved buffer holding
    /// `channels` channels. The cursor starts on the first channel; to select
    /// another sub-channel, slice the buffer forward by
    /// `channel_index * bytes_per_sample` first.
    pub fn interleaved(data: &'a [u8], channels: usize) -> Self {
        Cursor {
            data,
            offset: 0,
            layout: Interleaved::new(channels),
            _format: PhantomData,
        }
    }
}

impl<'a, F: SampleCodec, E: ByteOrder, L: Layout> Cursor<'a, F, E, L> {
    /// Reads the sample under the cursor as a normalized float.
    pub fn get_as_float(&self) -> f32 {
        F::read_float::<E>(self.sample_at(0))
    }

    /// Reads the sample under the cursor on the canonical 32-bit scale.
    pub fn get_as_int32(&self) -> i32 {
        F::read_int32::<E>(self.sample_at(0))
    }

    /// Moves to the next sample of this cursor's channel.
    pub fn advance(&mut self) {
        self.offset += self.bytes_between_samples();
    }

    /// Moves back to the previous sample of this cursor's channel.
    pub fn retreat(&mut self) {
        self.offset -= self.bytes_between_samples();
    }

    pub fn advance_by(&mut self, samples: usize) {
        self.offset += samples * self.bytes_between_samples();
    }

    pub fn channel_count(&self) -> usize {
        self.layout.channels()
    }

    /// Bytes between the start of successive samples of this channel.
    pub fn bytes_between_samples(&self) -> usize {
        self.layout.channels() * F::BYTES
    }

    /// Current byte offset into the underlying buffer.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Number of whole samples readable from the current position.
    pub fn samples_remaining(&self) -> usize {
        samples_in(self.data.len(), self.offset, self.bytes_between_samples(), F::BYTES)
    }

    /// The underlying buffer, from the start.
    pub fn raw_data(&self) -> &[u8] {
        self.data
    }

    pub const fn bytes_per_sample() -> usize {
        F::BYTES
    }

    pub const fn is_floating_point() -> bool {
        F::IS_FLOAT
    }

    pub const fn is_big_endian() -> bool {
        E::IS_BIG_ENDIAN
    }

    /// Accuracy of this format on the canonical 32-bit scale.
    pub const fn resolution() -> i32 {
        F::RESOLUTION
    }

    fn sample_at(&self, index: usize) -> &[u8] {
        let at = self.offset + index * self.bytes_between_samples();
        &self.data[at..at + F::BYTES]
    }
}

impl<'a, F: SampleCodec, E: ByteOrder> CursorMut<'a, F, E, NonInterleaved> {
    /// Creates a mutable cursor over one channel's contiguous samples.
    pub fn new(data: &'a mut [u8]) -> Self {
        CursorMut {
            data,
            offset: 0,
            layout: NonInterleaved,
            _format: PhantomData,
        }
    }
}

impl<'a, F: SampleCodec, E: ByteOrder> CursorMut<'a, F, E, Interleaved> {
    /// Creates a mutable cursor over one channel of an interleaved buffer.
    pub fn interleaved(data: &'a mut [u8], channels: usize) -> Self {
        CursorMut {
            data,
            offset: 0,
            layout: Interleaved::new(channels),
            _format: PhantomData,
        }
    }
}

impl<'a, F: SampleCodec, E: ByteOrder, L: Layout> CursorMut<'a, F, E, L> {
    pub fn get_as_float(&self) -> f32 {
        F::read_float::<E>(self.sample_at(0))
    }

    pub fn get_as_int32(&self) -> i32 {
        F::read_int32::<E>(self.sample_at(0))
    }

    /// Writes the sample under the cursor from a normalized float. Integer
    /// formats clip values outside their range.
    pub fn set_as_float(&mut self, value: f32) {
        F::write_float::<E>(self.sample_at_mut(0), value);
    }

    /// Writes the sample under the cursor from the canonical 32-bit scale.
    pub fn set_as_int32(&mut self, value: i32) {
        F::write_int32::<E>(self.sample_at_mut(0), value);
    }

    pub fn advance(&mut self) {
        self.offset += self.bytes_between_samples();
    }

    pub fn retreat(&mut self) {
        self.offset -= self.bytes_between_samples();
    }

    pub fn advance_by(&mut self, samples: usize) {
        self.offset += samples * self.bytes_between_samples();
    }

    pub fn channel_count(&self) -> usize {
        self.layout.channels()
    }

    pub fn bytes_between_samples(&self) -> usize {
        self.layout.channels() * F::BYTES
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn samples_remaining(&self) -> usize {
        samples_in(self.data.len(), self.offset, self.bytes_between_samples(), F::BYTES)
    }

    pub const fn bytes_per_sample() -> usize {
        F::BYTES
    }

    pub const fn is_floating_point() -> bool {
        F::IS_FLOAT
    }

    pub const fn is_big_endian() -> bool {
        E::IS_BIG_ENDIAN
    }

    pub const fn resolution() -> i32 {
        F::RESOLUTION
    }

    /// Converts `count` samples read from `source` into this cursor's format,
    /// starting at both cursors' current positions. Neither cursor moves.
    ///
    /// The borrow checker guarantees the two buffers are disjoint, so the
    /// walk always runs forward; for aliasing conversions see
    /// [`convert_in_place`].
    pub fn convert_from<SF, SE, SL>(&mut self, source: &Cursor<'_, SF, SE, SL>, count: usize)
    where
        SF: SampleCodec,
        SE: ByteOrder,
        SL: Layout,
    {
        assert!(
            source.samples_remaining() >= count,
            "source holds fewer than {count} samples"
        );
        assert!(
            self.samples_remaining() >= count,
            "destination holds fewer than {count} samples"
        );

        for index in 0..count {
            copy_sample::<SF, SE, F, E>(self.sample_at_mut(index), source.sample_at(index));
        }
    }

    /// Copies `count` samples from a cursor of the exact same encoding,
    /// bypassing float/int conversion.
    pub fn copy_from<SL: Layout>(&mut self, source: &Cursor<'_, F, E, SL>, count: usize) {
        assert!(
            source.samples_remaining() >= count,
            "source holds fewer than {count} samples"
        );
        assert!(
            self.samples_remaining() >= count,
            "destination holds fewer than {count} samples"
        );

        // contiguous on both sides collapses to one memcpy
        if !L::IS_INTERLEAVED && !SL::IS_INTERLEAVED {
            let bytes = count * F::BYTES;
            let from = &source.data[source.offset..source.offset + bytes];
            self.data[self.offset..self.offset + bytes].copy_from_slice(from);
        } else {
            for index in 0..count {
                self.sample_at_mut(index)
                    .copy_from_slice(source.sample_at(index));
            }
        }
    }

    /// Writes `count` silent samples at this cursor's channel stride.
    pub fn clear(&mut self, count: usize) {
        for index in 0..count {
            F::clear(self.sample_at_mut(index));
        }
    }

    fn sample_at(&self, index: usize) -> &[u8] {
        let at = self.offset + index * self.bytes_between_samples();
        &self.data[at..at + F::BYTES]
    }

    fn sample_at_mut(&mut self, index: usize) -> &mut [u8] {
        let at = self.offset + index * self.bytes_between_samples();
        &mut self.data[at..at + F::BYTES]
    }
}

/// Converts `count` samples between two formats within a single buffer.
///
/// Source samples are read from the start of `buffer` at the source format's
/// width and rewritten from the start at the destination format's width.
/// When the destination format is wider the walk runs high-to-low, so a
/// write never lands on a source sample that has not been read yet; this is
/// what makes narrow-to-wide conversion safe in place. Both regions are
/// treated as non-interleaved.
pub fn convert_in_place<SF, SE, DF, DE>(buffer: &mut [u8], count: usize)
where
    SF: SampleCodec,
    SE: ByteOrder,
    DF: SampleCodec,
    DE: ByteOrder,
{
    assert!(
        buffer.len() >= count * SF::BYTES && buffer.len() >= count * DF::BYTES,
        "buffer holds fewer than {count} samples of the wider format"
    );

    fn step<SF, SE, DF, DE>(buffer: &mut [u8], index: usize)
    where
        SF: SampleCodec,
        SE: ByteOrder,
        DF: SampleCodec,
        DE: ByteOrder,
    {
        let from = index * SF::BYTES;
        let to = index * DF::BYTES;
        if DF::IS_FLOAT {
            let value = SF::read_float::<SE>(&buffer[from..from + SF::BYTES]);
            DF::write_float::<DE>(&mut buffer[to..to + DF::BYTES], value);
        } else {
            let value = SF::read_int32::<SE>(&buffer[from..from + SF::BYTES]);
            DF::write_int32::<DE>(&mut buffer[to..to + DF::BYTES], value);
        }
    }

    if DF::BYTES > SF::BYTES {
        for index in (0..count).rev() {
            step::<SF, SE, DF, DE>(buffer, index);
        }
    } else {
        for index in 0..count {
            step::<SF, SE, DF, DE>(buffer, index);
        }
    }
}

/// One sample across formats. The destination codec picks the canonical
/// path: float formats convert through `f32`, integer formats through the
/// shifted 32-bit range. `IS_FLOAT` is a const, so the branch disappears at
/// monomorphization.
#[inline]
fn copy_sample<SF, SE, DF, DE>(dest: &mut [u8], source: &[u8])
where
    SF: SampleCodec,
    SE: ByteOrder,
    DF: SampleCodec,
    DE: ByteOrder,
{
    if DF::IS_FLOAT {
        DF::write_float::<DE>(dest, SF::read_float::<SE>(source));
    } else {
        DF::write_int32::<DE>(dest, SF::read_int32::<SE>(source));
    }
}

fn samples_in(len: usize, offset: usize, stride: usize, bytes: usize) -> usize {
    if len < offset + bytes {
        0
    } else {
        (len - offset - bytes) / stride + 1
    }
}
