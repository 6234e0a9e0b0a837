use packbench_core::{ByteCodec, CodecError};
use snap::raw::{Decoder, Encoder};

/// Snappy raw-format compressor (no stream framing).
pub struct SnappyCodec;

fn backend(e: snap::Error) -> CodecError {
    CodecError::Backend {
        codec: "snappy".to_string(),
        reason: e.to_string(),
    }
}

impl ByteCodec for SnappyCodec {
    fn name(&self) -> &'static str {
        "snappy"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Encoder::new().compress_vec(raw).map_err(backend)
    }

    fn decompress(&self, compressed: &[u8], _raw_len: usize) -> Result<Vec<u8>, CodecError> {
        // The raw format starts with the decompressed length.
        Decoder::new().decompress_vec(compressed).map_err(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_corrupt_input() {
        let raw: Vec<u8> = (0..4096u32).flat_map(|i| (i / 8).to_le_bytes()).collect();
        let packed = SnappyCodec.compress(&raw).unwrap();
        assert!(packed.len() < raw.len());
        assert_eq!(SnappyCodec.decompress(&packed, raw.len()).unwrap(), raw);

        let err = SnappyCodec.decompress(&[0xff, 0xff, 0xff], 0).unwrap_err();
        assert!(matches!(err, CodecError::Backend { ref codec, .. } if codec == "snappy"));
    }
}
