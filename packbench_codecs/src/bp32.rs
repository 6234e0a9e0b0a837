use packbench_core::codec::{check_aligned, check_input_span, check_output_room};
use packbench_core::{CodecError, Cursor, IntegerCodec, Progress};

/// Values per packed block.
pub const BLOCK: usize = 32;

/// Binary packing over 32-value blocks.
///
/// Each block is stored as one header word holding the bit width `w` of the
/// largest value (as `u32`), followed by `w` words carrying the 32 values
/// packed LSB-first. A block of zeros therefore costs one word and a block of
/// arbitrary values costs 33.
///
/// Only whole blocks are accepted; pair it with a remainder codec through
/// [`packbench_core::Composite`] for arbitrary lengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryPacking;

impl BinaryPacking {
    pub fn new() -> Self {
        Self
    }
}

fn bit_width(block: &[u32]) -> u32 {
    let or = block.iter().fold(0u32, |acc, &v| acc | v);
    32 - or.leading_zeros()
}

/// Pack 32 values of width `w` into exactly `w` words.
fn pack(block: &[u32], w: u32, out: &mut [i32]) {
    if w == 0 {
        return;
    }
    let mut acc: u64 = 0;
    let mut filled = 0u32;
    let mut o = 0;
    for &v in block {
        acc |= u64::from(v) << filled;
        filled += w;
        if filled >= 32 {
            out[o] = acc as u32 as i32;
            o += 1;
            acc >>= 32;
            filled -= 32;
        }
    }
    debug_assert_eq!(filled, 0);
    debug_assert_eq!(o, w as usize);
}

/// Inverse of [`pack`].
fn unpack(words: &[i32], w: u32, out: &mut [i32]) {
    if w == 0 {
        out.iter_mut().for_each(|v| *v = 0);
        return;
    }
    let mask: u64 = if w == 32 { u64::from(u32::MAX) } else { (1u64 << w) - 1 };
    let mut acc: u64 = 0;
    let mut avail = 0u32;
    let mut src = words.iter();
    for slot in out.iter_mut() {
        if avail < w {
            let next = src.next().map(|&x| x as u32).unwrap_or(0);
            acc |= u64::from(next) << avail;
            avail += 32;
        }
        *slot = (acc & mask) as u32 as i32;
        acc >>= w;
        avail -= w;
    }
}

impl IntegerCodec for BinaryPacking {
    fn name(&self) -> String {
        "bp32".to_string()
    }

    fn block_size(&self) -> usize {
        BLOCK
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        check_aligned("bp32", input_len, BLOCK)?;
        check_input_span("bp32", input, input_pos, input_len)?;

        let src = &input[input_pos.value()..input_pos.value() + input_len];
        let mut out_pos = output_pos;
        let mut block = [0u32; BLOCK];

        for chunk in src.chunks_exact(BLOCK) {
            for (b, &v) in block.iter_mut().zip(chunk) {
                *b = v as u32;
            }
            let w = bit_width(&block);
            check_output_room("bp32", output, out_pos, 1 + w as usize)?;

            let o = out_pos.value();
            output[o] = w as i32;
            pack(&block, w, &mut output[o + 1..o + 1 + w as usize]);
            out_pos.advance(1 + w as usize);
        }

        Ok(Progress::new(input_pos.advanced(input_len), out_pos))
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
        check_aligned("bp32", count, BLOCK)?;
        check_input_span("bp32", input, input_pos, input_len)?;
        check_output_room("bp32", output, output_pos, count)?;

        let end = input_pos.value() + input_len;
        let mut in_pos = input_pos;
        let mut out_pos = output_pos;

        for _ in 0..count / BLOCK {
            let h = in_pos.value();
            if h >= end {
                return Err(CodecError::TruncatedInput {
                    codec: "bp32".to_string(),
                    consumed: input_len,
                    needed: in_pos.value() - input_pos.value() + 1,
                });
            }
            let w = input[h] as u32;
            if w > 32 {
                return Err(CodecError::Malformed {
                    codec: "bp32".to_string(),
                    reason: format!("bit width {w} in block header at word {h}"),
                });
            }
            let body = h + 1;
            if body + w as usize > end {
                return Err(CodecError::TruncatedInput {
                    codec: "bp32".to_string(),
                    consumed: input_len,
                    needed: body + w as usize - input_pos.value(),
                });
            }

            let o = out_pos.value();
            unpack(
                &input[body..body + w as usize],
                w,
                &mut output[o..o + BLOCK],
            );
            in_pos.advance(1 + w as usize);
            out_pos.advance(BLOCK);
        }

        Ok(Progress::new(in_pos, out_pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[i32]) -> (Vec<i32>, Vec<i32>) {
        let codec = BinaryPacking;
        let mut packed = vec![0i32; 2 * data.len()];
        let p = codec
            .compress(data, Cursor::new(), data.len(), &mut packed, Cursor::new())
            .unwrap();
        packed.truncate(p.output.value());

        let mut back = vec![0i32; data.len()];
        let q = codec
            .decompress(
                &packed,
                Cursor::new(),
                packed.len(),
                &mut back,
                Cursor::new(),
                data.len(),
            )
            .unwrap();
        assert_eq!(q.input.value(), packed.len());
        (packed, back)
    }

    #[test]
    fn test_small_values_pack_tightly() {
        let data: Vec<i32> = (0..64).map(|i| i % 8).collect();
        let (packed, back) = round_trip(&data);
        // two blocks, 3 bits each: (1 header + 3 words) * 2
        assert_eq!(packed.len(), 8);
        assert_eq!(packed[0], 3);
        assert_eq!(back, data);
    }

    #[test]
    fn test_zero_block_is_header_only() {
        let data = vec![0i32; 32];
        let (packed, back) = round_trip(&data);
        assert_eq!(packed, vec![0]);
        assert_eq!(back, data);
    }

    #[test]
    fn test_negative_values_use_full_width() {
        let mut data: Vec<i32> = (0..32).collect();
        data[5] = -1;
        data[31] = i32::MIN;
        let (packed, back) = round_trip(&data);
        assert_eq!(packed.len(), 33);
        assert_eq!(back, data);
    }

    #[test]
    fn test_mixed_widths_round_trip() {
        let data: Vec<i32> = (0..32 * 9)
            .map(|i| {
                let w = (i / 32) as u32 * 3;
                if w == 0 {
                    0
                } else {
                    ((i as u32).wrapping_mul(2654435761) >> (32 - w.min(32))) as i32
                }
            })
            .collect();
        let (_, back) = round_trip(&data);
        assert_eq!(back, data);
    }

    #[test]
    fn test_unaligned_length_rejected() {
        let data = vec![1i32; 33];
        let mut out = vec![0i32; 100];
        let err = BinaryPacking
            .compress(&data, Cursor::new(), 33, &mut out, Cursor::new())
            .unwrap_err();
        assert!(matches!(err, CodecError::UnalignedLength { len: 33, block: 32, .. }));
    }

    #[test]
    fn test_truncated_stream_rejected() {
        let data: Vec<i32> = (0..64).collect();
        let mut packed = vec![0i32; 128];
        let p = BinaryPacking
            .compress(&data, Cursor::new(), 64, &mut packed, Cursor::new())
            .unwrap();
        let short = p.output.value() - 1;
        let mut back = vec![0i32; 64];
        let err = BinaryPacking
            .decompress(&packed, Cursor::new(), short, &mut back, Cursor::new(), 64)
            .unwrap_err();
        assert!(matches!(err, CodecError::TruncatedInput { .. }));
    }

    #[test]
    fn test_output_too_small() {
        let data: Vec<i32> = (0..32).map(|i| i * 1000).collect();
        let mut out = vec![0i32; 4];
        let err = BinaryPacking
            .compress(&data, Cursor::new(), 32, &mut out, Cursor::new())
            .unwrap_err();
        assert!(matches!(err, CodecError::OutputTooSmall { .. }));
    }
}
