use std::time::{Duration, Instant};

use serde::Serialize;

use crate::codec::ByteCodec;
use crate::error::{BenchError, RoundTripMismatch};

/// Outcome of one byte-compressor round trip.
#[derive(Debug, Clone, Serialize)]
pub struct ByteReport {
    pub codec: &'static str,
    pub raw_len: usize,
    pub compressed_len: usize,
    pub compress_time: Duration,
    pub decompress_time: Duration,
}

impl ByteReport {
    /// Compression ratio (raw / compressed).
    pub fn ratio(&self) -> f64 {
        if self.compressed_len == 0 {
            return 1.0;
        }
        self.raw_len as f64 / self.compressed_len as f64
    }
}

impl std::fmt::Display for ByteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} -> {} bytes ({:.2}x) in {} ns, back in {} ns",
            self.codec,
            self.raw_len,
            self.compressed_len,
            self.ratio(),
            self.compress_time.as_nanos(),
            self.decompress_time.as_nanos()
        )
    }
}

/// Compress and decompress `data` with `codec`, verifying the bytes come back
/// unchanged.
pub fn round_trip(codec: &dyn ByteCodec, data: &[u8]) -> Result<ByteReport, BenchError> {
    let t0 = Instant::now();
    let compressed = codec.compress(data)?;
    let compress_time = t0.elapsed();

    let t1 = Instant::now();
    let recovered = codec.decompress(&compressed, data.len())?;
    let decompress_time = t1.elapsed();

    if let Some(index) = first_difference(data, &recovered) {
        return Err(RoundTripMismatch {
            index,
            expected: data.get(index).map(|&b| i64::from(b)),
            actual: recovered.get(index).map(|&b| i64::from(b)),
            original_len: data.len(),
            recovered_len: recovered.len(),
        }
        .into());
    }

    let report = ByteReport {
        codec: codec.name(),
        raw_len: data.len(),
        compressed_len: compressed.len(),
        compress_time,
        decompress_time,
    };
    log::info!("{report}");
    Ok(report)
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

/// Little-endian byte image of an integer sequence, the payload the byte
/// compressor benchmark feeds to each codec.
pub fn to_le_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
