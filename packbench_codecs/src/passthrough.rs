use packbench_core::codec::{check_input_span, check_output_room};
use packbench_core::{CodecError, Cursor, IntegerCodec, Progress};

/// No-op codec: stores values verbatim, one word per integer.
///
/// Useful for:
/// - Verifying the composite split and the harness independently of any
///   real compression.
/// - A 32 bits-per-integer baseline in reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl IntegerCodec for PassThrough {
    fn name(&self) -> String {
        "copy".to_string()
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        check_input_span("copy", input, input_pos, input_len)?;
        check_output_room("copy", output, output_pos, input_len)?;
        let (i, o) = (input_pos.value(), output_pos.value());
        output[o..o + input_len].copy_from_slice(&input[i..i + input_len]);
        Ok(Progress::new(
            input_pos.advanced(input_len),
            output_pos.advanced(input_len),
        ))
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
        if count > input_len {
            return Err(CodecError::TruncatedInput {
                codec: self.name(),
                consumed: input_len,
                needed: count,
            });
        }
        check_input_span("copy", input, input_pos, count)?;
        check_output_room("copy", output, output_pos, count)?;
        let (i, o) = (input_pos.value(), output_pos.value());
        output[o..o + count].copy_from_slice(&input[i..i + count]);
        Ok(Progress::new(
            input_pos.advanced(count),
            output_pos.advanced(count),
        ))
    }
}
