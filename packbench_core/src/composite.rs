use crate::codec::IntegerCodec;
use crate::cursor::{Cursor, Progress};
use crate::error::CodecError;

/// Pairs a block-aligned `bulk` codec with a `remainder` codec so that a
/// codec built for whole blocks can compress sequences of any length.
///
/// # Stream layout
/// ```text
/// [bulk words for the first k - k % b elements][remainder words for the last k % b]
/// ```
/// There is no marker between the two segments and no element count in the
/// stream. Decompression recomputes the split from the `count` the caller
/// passes, which must be the `k` used at compression time.
///
/// The composite itself accepts any length (`block_size() == 1`), so it can be
/// nested as the bulk or remainder half of another composite.
#[derive(Debug, Clone)]
pub struct Composite<B, R> {
    bulk: B,
    remainder: R,
}

impl<B: IntegerCodec, R: IntegerCodec> Composite<B, R> {
    pub fn new(bulk: B, remainder: R) -> Self {
        Self { bulk, remainder }
    }

    pub fn bulk(&self) -> &B {
        &self.bulk
    }

    pub fn remainder(&self) -> &R {
        &self.remainder
    }

    /// Split `k` into `(aligned, tail)`: the prefix handed to the bulk codec
    /// and the tail handed to the remainder codec.
    pub fn split(&self, k: usize) -> (usize, usize) {
        let block = self.bulk.block_size().max(1);
        let aligned = k - k % block;
        (aligned, k - aligned)
    }
}

impl<B: IntegerCodec, R: IntegerCodec> IntegerCodec for Composite<B, R> {
    fn name(&self) -> String {
        format!("{}+{}", self.bulk.name(), self.remainder.name())
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        let (aligned, tail) = self.split(input_len);
        let mut progress = Progress::new(input_pos, output_pos);

        if aligned > 0 {
            progress = self
                .bulk
                .compress(input, progress.input, aligned, output, progress.output)?;
        }
        if tail > 0 {
            progress = self
                .remainder
                .compress(input, progress.input, tail, output, progress.output)?;
        }

        Ok(progress)
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
        let (aligned, tail) = self.split(count);
        let end = input_pos.value() + input_len;
        let mut progress = Progress::new(input_pos, output_pos);

        if aligned > 0 {
            progress = self.bulk.decompress(
                input,
                progress.input,
                input_len,
                output,
                progress.output,
                aligned,
            )?;
        }
        if tail > 0 {
            // The bulk codec reports how far it read; the remainder segment
            // starts right there and owns whatever is left of the span.
            let left = end.checked_sub(progress.input.value()).ok_or_else(|| {
                CodecError::Malformed {
                    codec: self.name(),
                    reason: format!(
                        "bulk segment consumed {} words of a {}-word span",
                        progress.consumed_since(input_pos),
                        input_len
                    ),
                }
            })?;
            progress = self.remainder.decompress(
                input,
                progress.input,
                left,
                output,
                progress.output,
                tail,
            )?;
        }

        Ok(progress)
    }
}
