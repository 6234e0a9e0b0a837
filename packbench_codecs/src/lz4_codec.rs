use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use packbench_core::{ByteCodec, CodecError};

/// LZ4 block compressor.
///
/// Fastest decompression of the bundled byte compressors, at a lower ratio.
pub struct Lz4Codec;

impl ByteCodec for Lz4Codec {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(compress_prepend_size(raw))
    }

    fn decompress(&self, compressed: &[u8], _raw_len: usize) -> Result<Vec<u8>, CodecError> {
        decompress_size_prepended(compressed).map_err(|e| CodecError::Backend {
            codec: "lz4".to_string(),
            reason: e.to_string(),
        })
    }
}
