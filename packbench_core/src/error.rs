use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by a codec when a length precondition is violated or a
/// buffer is too small. Passed through the composite codec unchanged.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{codec}: length {len} is not a multiple of block size {block}")]
    UnalignedLength {
        codec: String,
        len: usize,
        block: usize,
    },

    #[error("{codec}: empty input is not supported")]
    EmptyInput { codec: String },

    #[error("{codec}: input span {start}..{end} exceeds buffer length {available}")]
    InputOutOfRange {
        codec: String,
        start: usize,
        end: usize,
        available: usize,
    },

    #[error("{codec}: output buffer too small, needed {needed} slots but only {available} remain")]
    OutputTooSmall {
        codec: String,
        needed: usize,
        available: usize,
    },

    #[error("{codec}: compressed input ended after {consumed} words, {needed} needed")]
    TruncatedInput {
        codec: String,
        consumed: usize,
        needed: usize,
    },

    #[error("{codec}: malformed compressed data: {reason}")]
    Malformed { codec: String, reason: String },

    #[error("{codec}: byte compressor failed: {reason}")]
    Backend { codec: String, reason: String },
}

/// Decompressed output diverged from the original input.
///
/// `None` on either side marks a position past the end of that sequence
/// (the recovered stream came back shorter or longer than the original).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "problem recovering: index = {index}, in = {}, recovered = {}, original length = {original_len}, recovered length = {recovered_len}",
    fmt_slot(.expected),
    fmt_slot(.actual)
)]
pub struct RoundTripMismatch {
    pub index: usize,
    pub expected: Option<i64>,
    pub actual: Option<i64>,
    pub original_len: usize,
    pub recovered_len: usize,
}

fn fmt_slot(v: &Option<i64>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "<missing>".to_string(),
    }
}

/// A scoped external resource could not be acquired or released.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("another CPU profiling session is already active")]
    ProfilerBusy,

    #[error("cannot create profile file {path:?}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write profile file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("profiler backend failed: {0}")]
    Profiler(String),
}

/// Anything that stops a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Mismatch(#[from] RoundTripMismatch),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Invalid generator request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("cannot draw {n} distinct values from a range of {max}")]
    RangeTooSmall { n: usize, max: usize },

    #[error("range bound {max} does not fit in a 32-bit integer")]
    RangeTooLarge { max: usize },
}
