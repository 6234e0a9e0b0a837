use packbench_core::codec::{check_input_span, check_output_room};
use packbench_core::{CodecError, Cursor, IntegerCodec, Progress};

/// Variable-byte codec: each value, taken as `u32`, is written as 7-bit
/// groups, least significant first, with the high bit set on every byte but
/// the last. The bytes of one call are packed little-endian into words and the
/// last word is zero padded, so every call starts on a fresh word.
///
/// Accepts any non-zero length, which makes it the usual remainder codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableByte;

impl VariableByte {
    pub fn new() -> Self {
        Self
    }
}

/// Append the variable-byte encoding of `value` to `buf`.
fn encode_val(mut value: u32, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Byte `i` of a little-endian word stream.
#[inline]
fn byte_at(words: &[i32], i: usize) -> u8 {
    (words[i / 4] as u32 >> ((i % 4) * 8)) as u8
}

impl IntegerCodec for VariableByte {
    fn name(&self) -> String {
        "varbyte".to_string()
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        if input_len == 0 {
            return Err(CodecError::EmptyInput {
                codec: self.name(),
            });
        }
        check_input_span("varbyte", input, input_pos, input_len)?;

        let src = &input[input_pos.value()..input_pos.value() + input_len];
        let mut bytes = Vec::with_capacity(input_len * 2);
        for &v in src {
            encode_val(v as u32, &mut bytes);
        }

        let words = bytes.len().div_ceil(4);
        check_output_room("varbyte", output, output_pos, words)?;

        let o = output_pos.value();
        for (slot, chunk) in output[o..o + words].iter_mut().zip(bytes.chunks(4)) {
            let mut le = [0u8; 4];
            le[..chunk.len()].copy_from_slice(chunk);
            *slot = i32::from_le_bytes(le);
        }

        Ok(Progress::new(
            input_pos.advanced(input_len),
            output_pos.advanced(words),
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
        check_input_span("varbyte", input, input_pos, input_len)?;
        check_output_room("varbyte", output, output_pos, count)?;

        let words = &input[input_pos.value()..input_pos.value() + input_len];
        let total_bytes = words.len() * 4;
        let mut i = 0usize;

        let o = output_pos.value();
        for (n, slot) in output[o..o + count].iter_mut().enumerate() {
            let mut value = 0u32;
            let mut shift = 0u32;
            loop {
                if i >= total_bytes {
                    return Err(CodecError::TruncatedInput {
                        codec: self.name(),
                        consumed: input_len,
                        needed: input_len + 1,
                    });
                }
                let byte = byte_at(words, i);
                i += 1;
                value |= u32::from(byte & 0x7F) << shift;
                if byte & 0x80 == 0 {
                    break;
                }
                shift += 7;
                if shift > 28 {
                    return Err(CodecError::Malformed {
                        codec: self.name(),
                        reason: format!("value {n} runs past 5 bytes"),
                    });
                }
            }
            *slot = value as i32;
        }

        Ok(Progress::new(
            input_pos.advanced(i.div_ceil(4)),
            output_pos.advanced(count),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(data: &[i32]) -> Vec<i32> {
        let mut out = vec![0i32; 2 * data.len()];
        let p = VariableByte
            .compress(data, Cursor::new(), data.len(), &mut out, Cursor::new())
            .unwrap();
        out.truncate(p.output.value());
        out
    }

    #[test]
    fn test_small_values_take_one_byte() {
        let data = vec![1, 2, 3, 127];
        let packed = compress(&data);
        assert_eq!(packed, vec![i32::from_le_bytes([1, 2, 3, 127])]);
    }

    #[test]
    fn test_round_trip_full_range() {
        let data = vec![0, 1, 127, 128, 16_383, 16_384, i32::MAX, -1, i32::MIN, -12345];
        let packed = compress(&data);
        let mut back = vec![0i32; data.len()];
        let p = VariableByte
            .decompress(&packed, Cursor::new(), packed.len(), &mut back, Cursor::new(), data.len())
            .unwrap();
        assert_eq!(back, data);
        assert_eq!(p.input.value(), packed.len());
        assert_eq!(p.output.value(), data.len());
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut out = [0i32; 4];
        let err = VariableByte
            .compress(&[], Cursor::new(), 0, &mut out, Cursor::new())
            .unwrap_err();
        assert!(matches!(err, CodecError::EmptyInput { .. }));
    }

    #[test]
    fn test_asking_for_more_values_than_encoded_fails() {
        let packed = compress(&[300, 301, 302, 303]);
        let mut back = vec![0i32; 10];
        let err = VariableByte
            .decompress(&packed, Cursor::new(), packed.len(), &mut back, Cursor::new(), 10)
            .unwrap_err();
        assert!(matches!(err, CodecError::TruncatedInput { .. }));
    }

    #[test]
    fn test_overlong_value_is_malformed() {
        let words = vec![-1i32, -1];
        let mut back = vec![0i32; 1];
        let err = VariableByte
            .decompress(&words, Cursor::new(), 2, &mut back, Cursor::new(), 1)
            .unwrap_err();
        assert!(matches!(err, CodecError::Malformed { .. }));
    }
}
