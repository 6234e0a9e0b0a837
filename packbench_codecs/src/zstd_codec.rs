use packbench_core::{ByteCodec, CodecError};

/// Zstandard byte compressor at the configured level (default: 3).
///
/// Best for: general-purpose ratio on the byte image of integer data.
pub struct ZstdCodec {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl ByteCodec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::bulk::compress(raw, self.level).map_err(|e| CodecError::Backend {
            codec: "zstd".to_string(),
            reason: e.to_string(),
        })
    }

    fn decompress(&self, compressed: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError> {
        // The frame records its content size, raw_len only caps the allocation.
        zstd::bulk::decompress(compressed, raw_len).map_err(|e| CodecError::Backend {
            codec: "zstd".to_string(),
            reason: e.to_string(),
        })
    }
}
