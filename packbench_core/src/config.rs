use std::path::PathBuf;

use serde::Serialize;

/// Trial sizes used when none are given: 100 up to one million integers.
pub const DEFAULT_SIZES: &[usize] = &[100, 1_000, 10_000, 100_000, 1_000_000];

/// Default number of integers generated as benchmark input.
pub const DEFAULT_DATA_LEN: usize = 10_000_000;

/// Generated values are drawn from `[0, DEFAULT_RANGE_FACTOR * len)`.
pub const DEFAULT_RANGE_FACTOR: usize = 2;

/// Words allocated per input integer for the compression buffer.
pub const OUTPUT_EXPANSION: usize = 2;

/// Shape of the synthetic input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Uniform,
    #[default]
    Clustered,
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Clustered => write!(f, "clustered"),
        }
    }
}

impl std::str::FromStr for Distribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "clustered" => Ok(Self::Clustered),
            _ => Err(format!(
                "Unknown distribution: {s}. Available: uniform, clustered"
            )),
        }
    }
}

/// Everything a benchmark run needs besides the codec itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchConfig {
    /// Trial sizes, run in order. Sizes above the data length are skipped.
    pub sizes: Vec<usize>,
    /// Number of integers to generate.
    pub data_len: usize,
    /// Upper bound (exclusive) of generated values.
    pub max_value: usize,
    pub distribution: Distribution,
    pub seed: u64,
    /// Wrap every compress and decompress call in a profiling session.
    pub profile: bool,
    /// Directory receiving `cpu.compress.pprof` / `cpu.uncompress.pprof`.
    pub profile_dir: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            data_len: DEFAULT_DATA_LEN,
            max_value: DEFAULT_DATA_LEN * DEFAULT_RANGE_FACTOR,
            distribution: Distribution::Clustered,
            seed: 42,
            profile: false,
            profile_dir: PathBuf::from("."),
        }
    }
}
