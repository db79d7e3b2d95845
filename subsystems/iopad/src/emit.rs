//! # Pad Encoder
//!
//! Formatted emission of benchmark results into the pad stream.
//!
//! The format string carries three directives, `%c`, `%s` and `%d`; every
//! other character is written to the pad verbatim as a single byte.
//! Arguments are a closed set of typed values ([`Value`]) consumed
//! positionally, one per directive. Because the stream is decodable only by
//! replaying the exact directive sequence, anything that would let producer
//! and consumer drift apart is rejected: unknown directives, missing,
//! excess or mismatched arguments are all hard errors.

use core::ptr::NonNull;

use rvbench_memory::{RegionError, WORD_SIZE};

use crate::alloc::PadAllocator;

/// An argument value for one emit directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// Single byte, consumed by `%c`
    Char(u8),
    /// Text written byte-by-byte, terminator excluded, consumed by `%s`
    Text(&'a str),
    /// Machine word in native byte order, consumed by `%d`
    Word(u32),
}

/// Pad encoder error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitError {
    /// Pad region allocation failed
    Pad(RegionError),
    /// Directive letter is not one of `c`, `s`, `d`
    UnknownDirective(char),
    /// Format string ends on a bare `%`
    TruncatedDirective,
    /// More directives than arguments
    MissingArgument,
    /// Argument variant does not match its directive
    DirectiveMismatch,
    /// Arguments left over after the last directive
    ExcessArguments,
}

impl From<RegionError> for EmitError {
    fn from(err: RegionError) -> Self {
        EmitError::Pad(err)
    }
}

/// Formatted writer over the pad allocator.
///
/// Owns the allocator for the lifetime of the run; all result output flows
/// through [`emit`](PadWriter::emit).
#[derive(Debug)]
pub struct PadWriter<'a> {
    pad: PadAllocator<'a>,
}

impl<'a> PadWriter<'a> {
    /// Create a writer over `pad`.
    pub fn new(pad: PadAllocator<'a>) -> Self {
        PadWriter { pad }
    }

    /// Write one byte to the stream.
    pub fn put_char(&mut self, c: u8) -> Result<(), EmitError> {
        let p = self.pad.alloc(1)?;
        unsafe { p.as_ptr().write(c) };
        Ok(())
    }

    /// Write each byte of `text` as an individual byte allocation.
    ///
    /// No terminator is stored; the replaying consumer knows the length
    /// from the directive sequence it shares with the producer.
    pub fn put_text(&mut self, text: &str) -> Result<(), EmitError> {
        for b in text.bytes() {
            self.put_char(b)?;
        }
        Ok(())
    }

    /// Write one word in native byte order, aligned to a word boundary.
    pub fn put_word(&mut self, w: u32) -> Result<(), EmitError> {
        let p: NonNull<u8> = self.pad.alloc(WORD_SIZE)?;
        // The offset is word-aligned; the base is too on the firmware
        // layout, but a test buffer need not be.
        unsafe { p.cast::<u32>().as_ptr().write_unaligned(w) };
        Ok(())
    }

    /// Emit `format` with `args` consumed positionally by its directives.
    ///
    /// Literal characters pass through as single bytes. The call validates
    /// the whole pairing of directives and arguments; output already
    /// written when an error is detected stays in the pad.
    pub fn emit(&mut self, format: &str, args: &[Value<'_>]) -> Result<(), EmitError> {
        let mut args = args.iter();
        let mut bytes = format.bytes();

        while let Some(b) = bytes.next() {
            if b != b'%' {
                self.put_char(b)?;
                continue;
            }
            let directive = bytes.next().ok_or(EmitError::TruncatedDirective)?;
            if !matches!(directive, b'c' | b's' | b'd') {
                return Err(EmitError::UnknownDirective(directive as char));
            }
            let value = args.next().ok_or(EmitError::MissingArgument)?;
            match (directive, value) {
                (b'c', Value::Char(c)) => self.put_char(*c)?,
                (b's', Value::Text(s)) => self.put_text(s)?,
                (b'd', Value::Word(w)) => self.put_word(*w)?,
                _ => return Err(EmitError::DirectiveMismatch),
            }
        }

        if args.next().is_some() {
            return Err(EmitError::ExcessArguments);
        }
        Ok(())
    }

    /// Bytes of pad consumed so far
    #[inline]
    pub fn used(&self) -> usize {
        self.pad.used()
    }

    /// Shared view of the underlying allocator
    #[inline]
    pub fn allocator(&self) -> &PadAllocator<'a> {
        &self.pad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvbench_memory::Region;

    #[test]
    fn test_single_word_lands_at_start() {
        let mut buf = [0u8; 16];
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut buf)));

        writer.emit("%d", &[Value::Word(5)]).unwrap();
        assert_eq!(writer.used(), 4);
        drop(writer);
        assert_eq!(u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]), 5);
    }

    #[test]
    fn test_text_then_word_pads_to_boundary() {
        let mut buf = [0u8; 16];
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut buf)));

        writer.emit("%s", &[Value::Text("AB")]).unwrap();
        assert_eq!(writer.allocator().residue(), 2);
        writer.emit("%d", &[Value::Word(7)]).unwrap();
        assert_eq!(writer.used(), 8);
        drop(writer);

        assert_eq!(&buf[0..2], b"AB");
        assert_eq!(u32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]), 7);
    }

    #[test]
    fn test_literals_pass_through() {
        let mut buf = [0u8; 16];
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut buf)));

        writer.emit("ok:%c", &[Value::Char(b'!')]).unwrap();
        drop(writer);
        assert_eq!(&buf[0..4], b"ok:!");
    }

    #[test]
    fn test_unknown_directive_rejected() {
        let mut buf = [0u8; 16];
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut buf)));

        assert_eq!(
            writer.emit("%x", &[Value::Word(1)]),
            Err(EmitError::UnknownDirective('x'))
        );
        // Nothing was written for the rejected directive.
        assert_eq!(writer.used(), 0);
    }

    #[test]
    fn test_truncated_directive_rejected() {
        let mut buf = [0u8; 16];
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut buf)));

        assert_eq!(writer.emit("a%", &[]), Err(EmitError::TruncatedDirective));
        // The literal before the bad directive was already out.
        assert_eq!(writer.used(), 1);
    }

    #[test]
    fn test_argument_pairing_validated() {
        let mut buf = [0u8; 16];
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut buf)));

        assert_eq!(writer.emit("%d", &[]), Err(EmitError::MissingArgument));
        assert_eq!(
            writer.emit("%d", &[Value::Char(b'a')]),
            Err(EmitError::DirectiveMismatch)
        );
        assert_eq!(
            writer.emit("%c", &[Value::Char(b'a'), Value::Char(b'b')]),
            Err(EmitError::ExcessArguments)
        );
    }

    #[test]
    fn test_capacity_error_propagates() {
        let mut buf = [0u8; 4];
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut buf)));

        writer.emit("%d", &[Value::Word(1)]).unwrap();
        assert_eq!(
            writer.emit("%c", &[Value::Char(b'x')]),
            Err(EmitError::Pad(RegionError::CapacityExhausted))
        );
    }
}
