use packbench_core::codec::{check_input_span, check_output_room};
use packbench_core::{CodecError, Cursor, IntegerCodec, Progress};

use crate::bp32::BinaryPacking;
use crate::varbyte::VariableByte;

/// Delta + zig-zag front end for another integer codec.
///
/// Each value is replaced by its difference from the previous one (the first
/// against 0), and differences are zig-zag mapped so that small negative steps
/// stay small. The mapped stream is handed to `C`. Every call restarts from 0,
/// so the bulk and remainder halves of a composite decode independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct Delta<C> {
    inner: C,
}

/// `delta-bp32`
pub type DeltaBinaryPacking = Delta<BinaryPacking>;
/// `delta-varbyte`
pub type DeltaVariableByte = Delta<VariableByte>;

impl<C: IntegerCodec> Delta<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[inline]
fn zigzag(d: i32) -> i32 {
    (d << 1) ^ (d >> 31)
}

#[inline]
fn unzigzag(z: i32) -> i32 {
    (((z as u32) >> 1) as i32) ^ -(z & 1)
}

/// Zig-zag mapped first differences of `src`.
pub fn encode(src: &[i32]) -> Vec<i32> {
    let mut prev = 0i32;
    src.iter()
        .map(|&v| {
            let d = v.wrapping_sub(prev);
            prev = v;
            zigzag(d)
        })
        .collect()
}

/// Inverse of [`encode`], in place.
pub fn decode(buf: &mut [i32]) {
    let mut prev = 0i32;
    for v in buf.iter_mut() {
        prev = prev.wrapping_add(unzigzag(*v));
        *v = prev;
    }
}

impl<C: IntegerCodec> IntegerCodec for Delta<C> {
    fn name(&self) -> String {
        format!("delta-{}", self.inner.name())
    }

    fn block_size(&self) -> usize {
        self.inner.block_size()
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        check_input_span(&self.name(), input, input_pos, input_len)?;
        let deltas = encode(&input[input_pos.value()..input_pos.value() + input_len]);

        let p = self
            .inner
            .compress(&deltas, Cursor::new(), input_len, output, output_pos)?;
        Ok(Progress::new(input_pos.advanced(input_len), p.output))
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
        check_output_room(&self.name(), output, output_pos, count)?;
        let p = self
            .inner
            .decompress(input, input_pos, input_len, output, output_pos, count)?;

        let o = output_pos.value();
        decode(&mut output[o..o + count]);
        Ok(Progress::new(p.input, output_pos.advanced(count)))
    }
}
