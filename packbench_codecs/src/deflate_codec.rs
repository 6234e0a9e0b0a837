use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use packbench_core::{ByteCodec, CodecError};

/// Deflate with gzip framing.
pub struct DeflateCodec {
    pub level: Compression,
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

fn backend(e: std::io::Error) -> CodecError {
    CodecError::Backend {
        codec: "deflate".to_string(),
        reason: e.to_string(),
    }
}

impl ByteCodec for DeflateCodec {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut enc = GzEncoder::new(Vec::with_capacity(raw.len() / 2), self.level);
        enc.write_all(raw).map_err(backend)?;
        enc.finish().map_err(backend)
    }

    fn decompress(&self, compressed: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(raw_len);
        GzDecoder::new(compressed)
            .read_to_end(&mut out)
            .map_err(backend)?;
        Ok(out)
    }
}
