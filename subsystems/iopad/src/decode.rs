//! # Pad Decoder
//!
//! Harness-side replay reader. The pad stream is not self-describing, so
//! the reader reconstructs values by making the same directive-shaped
//! takes, in the same order, as the producer's emit calls; its cursor then
//! skips alignment fill exactly where the producer inserted it.

use rvbench_memory::WORD_SIZE;

/// Pad decoder error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream ended before the requested value
    UnexpectedEnd,
}

/// Replay reader over a snapshot of the pad region.
#[derive(Debug)]
pub struct PadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PadReader<'a> {
    /// Create a reader over `data`, a snapshot starting at the pad base.
    pub fn new(data: &'a [u8]) -> Self {
        PadReader { data, pos: 0 }
    }

    /// Read one byte, mirroring a `%c` directive or a format literal.
    pub fn take_char(&mut self) -> Result<u8, DecodeError> {
        let b = *self.data.get(self.pos).ok_or(DecodeError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(b)
    }

    /// Read `len` text bytes, mirroring a `%s` directive.
    ///
    /// The producer stored no terminator, so the replayed length must come
    /// from the shared directive knowledge.
    pub fn take_text(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(len).ok_or(DecodeError::UnexpectedEnd)?;
        let s = self
            .data
            .get(self.pos..end)
            .ok_or(DecodeError::UnexpectedEnd)?;
        self.pos = end;
        Ok(s)
    }

    /// Read one native-endian word, mirroring a `%d` directive.
    ///
    /// Skips to the next word boundary first, as the producer's allocator
    /// did before placing the word.
    pub fn take_word(&mut self) -> Result<u32, DecodeError> {
        let misalign = self.pos % WORD_SIZE;
        if misalign != 0 {
            self.pos += WORD_SIZE - misalign;
        }
        let end = self
            .pos
            .checked_add(WORD_SIZE)
            .ok_or(DecodeError::UnexpectedEnd)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(DecodeError::UnexpectedEnd)?;
        self.pos = end;
        Ok(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Current byte offset into the stream
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}
