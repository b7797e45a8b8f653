//! Channel layout strategies.
//!
//! A layout decides how far apart successive samples of one channel sit in a
//! buffer: one sample width for [`NonInterleaved`] data, one frame width for
//! [`Interleaved`] data.

/// Channel layout of a sample buffer.
pub trait Layout: Copy {
    const IS_INTERLEAVED: bool;

    /// Number of interleaved channels sharing the buffer. Always 1 for
    /// non-interleaved data, so the stride is never zero.
    fn channels(&self) -> usize;
}

/// Each channel lives in its own contiguous buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInterleaved;

impl Layout for NonInterleaved {
    const IS_INTERLEAVED: bool = false;

    fn channels(&self) -> usize {
        1
    }
}

/// Samples of several channels stored round-robin in one buffer (L,R,L,R,..).
#[derive(Debug, Clone, Copy)]
pub struct Interleaved {
    channels: usize,
}

impl Interleaved {
    pub fn new(channels: usize) -> Self {
        assert!(channels >= 1, "interleaved layout needs at least 1 channel");
        Interleaved { channels }
    }
}

impl Layout for Interleaved {
    const IS_INTERLEAVED: bool = true;

    fn channels(&self) -> usize {
        self.channels
    }
}
