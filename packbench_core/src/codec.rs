use std::sync::Arc;

use crate::cursor::{Cursor, Progress};
use crate::error::CodecError;

/// Core integer compression abstraction.
///
/// Each `IntegerCodec` implementation:
/// - Compresses exactly `input_len` elements starting at `input_pos` and
///   writes 32-bit words starting at `output_pos`.
/// - Decompresses from at most `input_len` words and produces exactly `count`
///   elements. The element count is never recovered from the compressed words
///   alone; the caller must supply the count it compressed.
/// - Returns both advanced cursors on success and never writes past the end
///   of `output`.
/// - Holds no per-call state, so a single instance may be reused across calls
///   and shared between threads.
pub trait IntegerCodec: Send + Sync {
    /// Human-readable codec name for reports.
    fn name(&self) -> String;

    /// Element counts passed to `compress` and `decompress` must be a
    /// multiple of this. `1` means any length.
    fn block_size(&self) -> usize {
        1
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError>;

    fn decompress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
        count: usize,
    ) -> Result<Progress, CodecError>;
}

impl<C: IntegerCodec + ?Sized> IntegerCodec for &C {
    fn name(&self) -> String {
        (**self).name()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        (**self).compress(input, input_pos, input_len, output, output_pos)
    }

    fn decompress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
        count: usize,
    ) -> Result<Progress, CodecError> {
        (**self).decompress(input, input_pos, input_len, output, output_pos, count)
    }
}

impl<C: IntegerCodec + ?Sized> IntegerCodec for Box<C> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        (**self).compress(input, input_pos, input_len, output, output_pos)
    }

    fn decompress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
        count: usize,
    ) -> Result<Progress, CodecError> {
        (**self).decompress(input, input_pos, input_len, output, output_pos, count)
    }
}

impl<C: IntegerCodec + ?Sized> IntegerCodec for Arc<C> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        (**self).compress(input, input_pos, input_len, output, output_pos)
    }

    fn decompress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
        count: usize,
    ) -> Result<Progress, CodecError> {
        (**self).decompress(input, input_pos, input_len, output, output_pos, count)
    }
}

/// General-purpose byte compressor (zstd, lz4, deflate, ...).
///
/// Unlike [`IntegerCodec`] this works on whole owned buffers. `raw_len` is
/// passed back on decompress so codecs whose framing does not record the
/// original size can still pre-size their output.
pub trait ByteCodec: Send + Sync {
    fn name(&self) -> &'static str;

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn decompress(&self, compressed: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError>;
}

// ── Span checks shared by codec implementations ────────────────────────────

/// Check that `input[pos .. pos + len]` is in bounds.
pub fn check_input_span(
    codec: &str,
    input: &[i32],
    pos: Cursor,
    len: usize,
) -> Result<(), CodecError> {
    let start = pos.value();
    let end = start.saturating_add(len);
    if end > input.len() {
        return Err(CodecError::InputOutOfRange {
            codec: codec.to_string(),
            start,
            end,
            available: input.len(),
        });
    }
    Ok(())
}

/// Check that `needed` slots fit in `output` starting at `pos`.
pub fn check_output_room(
    codec: &str,
    output: &[i32],
    pos: Cursor,
    needed: usize,
) -> Result<(), CodecError> {
    let available = output.len().saturating_sub(pos.value());
    if needed > available {
        return Err(CodecError::OutputTooSmall {
            codec: codec.to_string(),
            needed,
            available,
        });
    }
    Ok(())
}

/// Check that `len` is a multiple of `block`.
pub fn check_aligned(codec: &str, len: usize, block: usize) -> Result<(), CodecError> {
    if block > 1 && len % block != 0 {
        return Err(CodecError::UnalignedLength {
            codec: codec.to_string(),
            len,
            block,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_output_room_reports_remaining_space() {
        let out = [0i32; 8];
        assert!(check_output_room("t", &out, Cursor::at(3), 5).is_ok());
        match check_output_room("t", &out, Cursor::at(3), 6) {
            Err(CodecError::OutputTooSmall { needed, available, .. }) => {
                assert_eq!(needed, 6);
                assert_eq!(available, 5);
            }
            other => panic!("expected OutputTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn test_check_input_span_bounds() {
        let input = [1i32; 10];
        assert!(check_input_span("t", &input, Cursor::at(4), 6).is_ok());
        assert!(matches!(
            check_input_span("t", &input, Cursor::at(4), 7),
            Err(CodecError::InputOutOfRange { end: 11, .. })
        ));
    }

    #[test]
    fn test_check_aligned() {
        assert!(check_aligned("t", 96, 32).is_ok());
        assert!(check_aligned("t", 0, 32).is_ok());
        assert!(check_aligned("t", 7, 1).is_ok());
        assert!(matches!(
            check_aligned("t", 100, 32),
            Err(CodecError::UnalignedLength { len: 100, block: 32, .. })
        ));
    }
}
