use packbench_core::codec::{check_input_span, check_output_room};
use packbench_core::{ByteCodec, CodecError, Cursor, IntegerCodec, Progress};

/// Smallest call, in integers, whose framed output always fits two words per
/// integer.
///
/// Every bundled byte compressor adds a fixed frame (gzip header and trailer,
/// zstd frame header, size prefixes) on top of the length word. Below this
/// size that overhead can exceed the `2k`-word compression buffer and the
/// call fails with `OutputTooSmall`; zstd, lz4 and deflate already fail at a
/// single integer.
pub const MIN_FRAMED_LEN: usize = 8;

/// Runs a byte compressor over the little-endian image of the integers.
///
/// Layout of one call: a header word with the compressed byte length, then
/// the compressed bytes packed into words (last word zero padded). See
/// [`MIN_FRAMED_LEN`] for the smallest call that fits a `2k`-word buffer.
pub struct Packed<B> {
    backend: B,
}

impl<B: ByteCodec> Packed<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: ByteCodec> IntegerCodec for Packed<B> {
    fn name(&self) -> String {
        self.backend.name().to_string()
    }

    fn compress(
        &self,
        input: &[i32],
        input_pos: Cursor,
        input_len: usize,
        output: &mut [i32],
        output_pos: Cursor,
    ) -> Result<Progress, CodecError> {
        check_input_span(self.backend.name(), input, input_pos, input_len)?;
        let raw: Vec<u8> = input[input_pos.value()..input_pos.value() + input_len]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let compressed = self.backend.compress(&raw)?;

        let byte_len = i32::try_from(compressed.len()).map_err(|_| CodecError::Malformed {
            codec: self.name(),
            reason: format!("{} compressed bytes overflow the length word", compressed.len()),
        })?;
        let body = compressed.len().div_ceil(4);
        check_output_room(self.backend.name(), output, output_pos, 1 + body)?;

        let o = output_pos.value();
        output[o] = byte_len;
        for (slot, chunk) in output[o + 1..o + 1 + body]
            .iter_mut()
            .zip(compressed.chunks(4))
        {
            let mut le = [0u8; 4];
            le[..chunk.len()].copy_from_slice(chunk);
            *slot = i32::from_le_bytes(le);
        }

        Ok(Progress::new(
            input_pos.advanced(input_len),
            output_pos.advanced(1 + body),
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
        check_input_span(self.backend.name(), input, input_pos, input_len)?;
        check_output_room(self.backend.name(), output, output_pos, count)?;
        if input_len == 0 {
            return Err(CodecError::TruncatedInput {
                codec: self.name(),
                consumed: 0,
                needed: 1,
            });
        }

        let h = input_pos.value();
        let byte_len = input[h] as u32 as usize;
        let body = byte_len.div_ceil(4);
        if 1 + body > input_len {
            return Err(CodecError::TruncatedInput {
                codec: self.name(),
                consumed: input_len,
                needed: 1 + body,
            });
        }

        let mut compressed: Vec<u8> = input[h + 1..h + 1 + body]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        compressed.truncate(byte_len);

        let raw = self.backend.decompress(&compressed, count * 4)?;
        if raw.len() != count * 4 {
            return Err(CodecError::Malformed {
                codec: self.name(),
                reason: format!("decoded {} bytes, expected {}", raw.len(), count * 4),
            });
        }

        let o = output_pos.value();
        for (slot, chunk) in output[o..o + count].iter_mut().zip(raw.chunks_exact(4)) {
            *slot = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        Ok(Progress::new(
            input_pos.advanced(1 + body),
            output_pos.advanced(count),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeflateCodec, Lz4Codec, SnappyCodec, ZstdCodec};

    fn round_trip<B: ByteCodec>(codec: &Packed<B>, data: &[i32]) -> usize {
        let mut out = vec![0i32; 2 * data.len() + 64];
        let p = codec
            .compress(data, Cursor::new(), data.len(), &mut out, Cursor::new())
            .unwrap();
        let mut back = vec![0i32; data.len()];
        let q = codec
            .decompress(&out, Cursor::new(), p.output.value(), &mut back, Cursor::new(), data.len())
            .unwrap();
        assert_eq!(back, data);
        assert_eq!(q.input, p.output);
        p.output.value()
    }

    #[test]
    fn test_every_backend_round_trips() {
        let data: Vec<i32> = (0..1000).map(|i| (i / 10) * 7 - 50).collect();
        assert!(round_trip(&Packed::new(ZstdCodec::default()), &data) < data.len());
        assert!(round_trip(&Packed::new(Lz4Codec), &data) < data.len());
        assert!(round_trip(&Packed::new(DeflateCodec::default()), &data) < data.len());
        assert!(round_trip(&Packed::new(SnappyCodec), &data) < data.len());
    }

    #[test]
    fn test_wrong_count_is_malformed() {
        let codec = Packed::new(Lz4Codec);
        let data = vec![5i32; 20];
        let mut out = vec![0i32; 64];
        let p = codec
            .compress(&data, Cursor::new(), 20, &mut out, Cursor::new())
            .unwrap();
        let mut back = vec![0i32; 10];
        let err = codec
            .decompress(&out, Cursor::new(), p.output.value(), &mut back, Cursor::new(), 10)
            .unwrap_err();
        assert!(matches!(err, CodecError::Malformed { .. }));
    }

    #[test]
    fn test_missing_header_is_truncated() {
        let codec = Packed::new(ZstdCodec::default());
        let mut back = vec![0i32; 4];
        let err = codec
            .decompress(&[], Cursor::new(), 0, &mut back, Cursor::new(), 4)
            .unwrap_err();
        assert!(matches!(err, CodecError::TruncatedInput { .. }));
    }
}
