use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::codec::IntegerCodec;
use crate::config::OUTPUT_EXPANSION;
use crate::cursor::Cursor;
use crate::error::{BenchError, CodecError, RoundTripMismatch};
use crate::profile::{CpuProfiler, Phase, ProfileSession};

/// Result of one timed codec call.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub elapsed: Duration,
    pub value: T,
}

/// Measurements for one trial size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialReport {
    pub codec: String,
    /// Number of integers compressed (`k`).
    pub size: usize,
    /// 32-bit words produced by compression.
    pub compressed_words: usize,
    pub compress_nanos: u64,
    pub decompress_nanos: u64,
    /// xxh3-64 of the compressed words (little-endian).
    pub digest: u64,
}

impl TrialReport {
    /// Compressed bits per original integer.
    pub fn bits_per_int(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        (self.compressed_words * 32) as f64 / self.size as f64
    }

    /// Compression throughput in millions of integers per second.
    pub fn compress_mis(&self) -> f64 {
        mis(self.size, self.compress_nanos)
    }

    /// Decompression throughput in millions of integers per second.
    pub fn decompress_mis(&self) -> f64 {
        mis(self.size, self.decompress_nanos)
    }
}

impl std::fmt::Display for TrialReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6} {:.2} {:.2}",
            self.bits_per_int(),
            self.compress_mis(),
            self.decompress_mis()
        )
    }
}

fn mis(n: usize, nanos: u64) -> f64 {
    let secs = nanos.max(1) as f64 / 1_000_000_000.0;
    n as f64 / secs / 1_000_000.0
}

fn nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// xxh3-64 over the little-endian bytes of `words`.
pub fn digest(words: &[i32]) -> u64 {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    xxh3_64(&bytes)
}

// ── Single calls ───────────────────────────────────────────────────────────

/// Compress the first `k` elements of `input` into a fresh `2k`-word buffer.
///
/// The returned buffer is truncated to the words actually written.
pub fn compress(
    codec: &dyn IntegerCodec,
    input: &[i32],
    k: usize,
) -> Result<Timed<Vec<i32>>, CodecError> {
    let mut out = vec![0i32; k * OUTPUT_EXPANSION];
    let t0 = Instant::now();
    let progress = codec.compress(input, Cursor::new(), k, &mut out, Cursor::new())?;
    let elapsed = t0.elapsed();
    out.truncate(progress.output.value());
    Ok(Timed {
        elapsed,
        value: out,
    })
}

/// Decompress `compressed` back into `k` elements.
///
/// `k` must be the element count passed to [`compress`]; the compressed
/// words do not record it.
pub fn decompress(
    codec: &dyn IntegerCodec,
    compressed: &[i32],
    k: usize,
) -> Result<Timed<Vec<i32>>, CodecError> {
    let mut out = vec![0i32; k];
    let t0 = Instant::now();
    let progress = codec.decompress(
        compressed,
        Cursor::new(),
        compressed.len(),
        &mut out,
        Cursor::new(),
        k,
    )?;
    let elapsed = t0.elapsed();
    out.truncate(progress.output.value());
    Ok(Timed {
        elapsed,
        value: out,
    })
}

/// Compare both sequences element by element and report the first
/// divergence. A length difference is reported at the first missing index.
pub fn verify(original: &[i32], recovered: &[i32]) -> Result<(), RoundTripMismatch> {
    let longest = original.len().max(recovered.len());
    for i in 0..longest {
        let expected = original.get(i).copied();
        let actual = recovered.get(i).copied();
        if expected != actual {
            return Err(RoundTripMismatch {
                index: i,
                expected: expected.map(i64::from),
                actual: actual.map(i64::from),
                original_len: original.len(),
                recovered_len: recovered.len(),
            });
        }
    }
    Ok(())
}

// ── Harness ────────────────────────────────────────────────────────────────

struct ProfileTarget {
    profiler: Box<dyn CpuProfiler>,
    dir: PathBuf,
}

/// Runs compress/decompress trials for a list of sizes, timing both phases
/// and verifying the round trip after every trial.
///
/// A round-trip mismatch ends the run: the remaining sizes are not measured
/// and the mismatch is returned to the caller.
pub struct Harness<'c> {
    codec: &'c dyn IntegerCodec,
    profiling: Option<ProfileTarget>,
}

impl<'c> Harness<'c> {
    pub fn new(codec: &'c dyn IntegerCodec) -> Self {
        Self {
            codec,
            profiling: None,
        }
    }

    /// Profile every compress and decompress call, writing into `dir`.
    ///
    /// Each trial overwrites the previous trial's profile files.
    pub fn with_profiling(mut self, profiler: Box<dyn CpuProfiler>, dir: impl AsRef<Path>) -> Self {
        self.profiling = Some(ProfileTarget {
            profiler,
            dir: dir.as_ref().to_path_buf(),
        });
        self
    }

    pub fn codec(&self) -> &dyn IntegerCodec {
        self.codec
    }

    /// Run one trial per size in `sizes`, skipping sizes larger than `data`.
    pub fn run(&mut self, data: &[i32], sizes: &[usize]) -> Result<Vec<TrialReport>, BenchError> {
        let mut reports = Vec::with_capacity(sizes.len());
        for &k in sizes {
            if k > data.len() {
                log::debug!(
                    "skipping size {k}: only {} integers available",
                    data.len()
                );
                continue;
            }
            reports.push(self.trial(data, k)?);
        }
        log::info!(
            "{}: {} of {} sizes measured",
            self.codec.name(),
            reports.len(),
            sizes.len()
        );
        Ok(reports)
    }

    /// Compress, decompress and verify the first `k` elements of `data`.
    /// `k` must not exceed `data.len()`; `run` filters sizes first.
    fn trial(&mut self, data: &[i32], k: usize) -> Result<TrialReport, BenchError> {
        let input = &data[..k];

        let packed = self.timed(Phase::Compress, |codec| compress(codec, input, k))?;
        let recovered = self.timed(Phase::Decompress, |codec| {
            decompress(codec, &packed.value, k)
        })?;

        verify(input, &recovered.value)?;

        let report = TrialReport {
            codec: self.codec.name(),
            size: k,
            compressed_words: packed.value.len(),
            compress_nanos: nanos(packed.elapsed),
            decompress_nanos: nanos(recovered.elapsed),
            digest: digest(&packed.value),
        };
        log::debug!("{} k={k}: {report}", report.codec);
        Ok(report)
    }

    fn timed<F>(&mut self, phase: Phase, call: F) -> Result<Timed<Vec<i32>>, BenchError>
    where
        F: FnOnce(&dyn IntegerCodec) -> Result<Timed<Vec<i32>>, CodecError>,
    {
        match self.profiling.as_mut() {
            None => Ok(call(self.codec)?),
            Some(target) => {
                let session = ProfileSession::begin(target.profiler.as_mut(), &target.dir, phase)?;
                // On codec failure the session is dropped, which stops the
                // backend and releases the profiler.
                let result = call(self.codec)?;
                session.finish()?;
                Ok(result)
            }
        }
    }
}
