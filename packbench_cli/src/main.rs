use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use packbench_codecs::{
    byte_codec_by_name, parse_chain, BYTE_CODEC_NAMES, CODEC_NAMES, MIN_FRAMED_LEN,
};
use packbench_core::bytes::{round_trip, to_le_bytes};
use packbench_core::config::{DEFAULT_DATA_LEN, DEFAULT_RANGE_FACTOR, DEFAULT_SIZES};
use packbench_core::{generators, BenchConfig, CpuProfiler, Distribution, Harness};

#[cfg(feature = "pprof")]
mod profiler;

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "packbench",
    about = "Benchmark and round-trip verify composite integer codecs",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress, decompress and verify generated integers at several sizes
    ///
    /// Prints one line per size: bits per integer, then compression and
    /// decompression speed in millions of integers per second.
    Run {
        /// Codec chain, e.g. "delta-bp32+delta-varbyte" (bulk first)
        #[arg(short, long, default_value = "delta-bp32+delta-varbyte")]
        codec: String,
        /// Comma-separated trial sizes
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_SIZES.to_vec())]
        sizes: Vec<usize>,
        /// Number of integers to generate
        #[arg(short = 'n', long, default_value_t = DEFAULT_DATA_LEN)]
        data_len: usize,
        /// Exclusive upper bound of generated values (default: 2 x data length)
        #[arg(long)]
        max: Option<usize>,
        /// Input shape: uniform | clustered
        #[arg(short, long, default_value_t = Distribution::Clustered)]
        distribution: Distribution,
        /// Fixed random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Print the configuration and all trial reports as JSON
        #[arg(long)]
        json: bool,
        /// Profile every compress and decompress call
        #[arg(long)]
        profile: bool,
        /// Directory receiving cpu.compress.pprof and cpu.uncompress.pprof
        #[arg(long, default_value = ".")]
        profile_dir: PathBuf,
    },
    /// Round-trip the byte image of generated integers through a byte compressor
    Bytes {
        /// Compressor: zstd | lz4 | deflate | snappy
        #[arg(short, long, default_value = "zstd")]
        codec: String,
        /// Zstd compression level (1–22, only used with --codec zstd)
        #[arg(long, default_value_t = 3)]
        zstd_level: i32,
        /// Number of integers to generate
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        count: usize,
        /// Input shape: uniform | clustered
        #[arg(short, long, default_value_t = Distribution::Clustered)]
        distribution: Distribution,
        /// Fixed random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// List codec names accepted by --codec
    List,
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    // RUST_LOG, when set, overrides -v
    builder.parse_default_env();
    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    let _ = builder.try_init();
}

fn generate(cfg: &BenchConfig) -> anyhow::Result<Vec<i32>> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let data = match cfg.distribution {
        Distribution::Uniform => generators::uniform(&mut rng, cfg.data_len, cfg.max_value),
        Distribution::Clustered => generators::clustered(&mut rng, cfg.data_len, cfg.max_value),
    }
    .with_context(|| {
        format!(
            "generating {} {} integers below {}",
            cfg.data_len, cfg.distribution, cfg.max_value
        )
    })?;
    log::info!("generated {} integers ({})", data.len(), cfg.distribution);
    Ok(data)
}

#[cfg(feature = "pprof")]
fn cpu_profiler() -> anyhow::Result<Box<dyn CpuProfiler>> {
    Ok(Box::new(profiler::PprofProfiler::new()))
}

#[cfg(not(feature = "pprof"))]
fn cpu_profiler() -> anyhow::Result<Box<dyn CpuProfiler>> {
    log::warn!("built without the `pprof` feature; profile files hold wall-clock and process cpu timings only");
    Ok(Box::new(packbench_core::TimingProfiler::new()))
}

/// Byte count in the largest binary unit it fills, e.g. `3.81 MiB`.
fn human_bytes(n: usize) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    let mut scaled = n as f64;
    let mut unit = None;
    for u in UNITS {
        if scaled < 1024.0 {
            break;
        }
        scaled /= 1024.0;
        unit = Some(u);
    }
    match unit {
        Some(u) => format!("{scaled:.2} {u}"),
        None => format!("{n} B"),
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_bench(chain: &str, cfg: BenchConfig, json: bool) -> anyhow::Result<()> {
    let codec = parse_chain(chain)?;
    let data = generate(&cfg)?;

    let mut harness = Harness::new(codec.as_ref());
    if cfg.profile {
        std::fs::create_dir_all(&cfg.profile_dir)
            .with_context(|| format!("creating profile directory {:?}", cfg.profile_dir))?;
        harness = harness.with_profiling(cpu_profiler()?, &cfg.profile_dir);
    }

    eprintln!("  codec       : {}", codec.name());
    eprintln!("  data        : {} {} integers", cfg.data_len, cfg.distribution);

    let reports = harness
        .run(&data, &cfg.sizes)
        .with_context(|| format!("benchmarking {}", codec.name()))?;

    if json {
        let doc = serde_json::json!({ "config": cfg, "trials": reports });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for report in &reports {
            println!("{report}");
        }
    }

    if cfg.profile {
        eprintln!("  profiles    : {:?}", cfg.profile_dir);
    }
    Ok(())
}

fn run_bytes(
    codec_name: &str,
    zstd_level: i32,
    count: usize,
    distribution: Distribution,
    seed: u64,
) -> anyhow::Result<()> {
    let codec = byte_codec_by_name(codec_name, zstd_level)?;
    let cfg = BenchConfig {
        data_len: count,
        max_value: count.saturating_mul(DEFAULT_RANGE_FACTOR),
        distribution,
        seed,
        ..BenchConfig::default()
    };
    let raw = to_le_bytes(&generate(&cfg)?);

    let report = round_trip(codec.as_ref(), &raw)
        .with_context(|| format!("round-tripping {} bytes through {}", raw.len(), codec.name()))?;

    eprintln!("  codec       : {}", report.codec);
    eprintln!("  raw size    : {}", human_bytes(report.raw_len));
    eprintln!("  compressed  : {}", human_bytes(report.compressed_len));
    eprintln!("  ratio       : {:.2}x", report.ratio());
    eprintln!("  compress    : {} ns", report.compress_time.as_nanos());
    eprintln!("  decompress  : {} ns", report.decompress_time.as_nanos());
    Ok(())
}

fn run_list() {
    println!("integer codecs (join with '+' for a composite, bulk first):");
    for name in CODEC_NAMES {
        if BYTE_CODEC_NAMES.contains(name) {
            println!("  {name:<14} needs {MIN_FRAMED_LEN}+ integers per call");
        } else {
            println!("  {name}");
        }
    }
    println!("byte compressors:");
    for name in BYTE_CODEC_NAMES {
        println!("  {name}");
    }
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            codec,
            sizes,
            data_len,
            max,
            distribution,
            seed,
            json,
            profile,
            profile_dir,
        } => {
            let cfg = BenchConfig {
                sizes,
                data_len,
                max_value: max.unwrap_or_else(|| data_len.saturating_mul(DEFAULT_RANGE_FACTOR)),
                distribution,
                seed,
                profile,
                profile_dir,
            };
            run_bench(&codec, cfg, json)
        }
        Commands::Bytes {
            codec,
            zstd_level,
            count,
            distribution,
            seed,
        } => run_bytes(&codec, zstd_level, count, distribution, seed),
        Commands::List => {
            run_list();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_bytes_picks_binary_unit() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(1023), "1023 B");
        assert_eq!(human_bytes(1024), "1.00 KiB");
        assert_eq!(human_bytes(4_000_000), "3.81 MiB");
        assert_eq!(human_bytes(3 << 30), "3.00 GiB");
    }

    #[test]
    fn test_json_report_echoes_config() {
        let cfg = BenchConfig {
            distribution: Distribution::Uniform,
            ..BenchConfig::default()
        };
        let trials: Vec<packbench_core::TrialReport> = Vec::new();
        let doc = serde_json::json!({ "config": cfg, "trials": trials });
        assert_eq!(doc["config"]["distribution"], "uniform");
        assert_eq!(doc["config"]["seed"], 42);
        assert_eq!(doc["trials"], serde_json::json!([]));
    }

    #[test]
    fn test_cli_parses_chain_and_sizes() {
        let cli = Cli::try_parse_from([
            "packbench", "run", "--codec", "bp32+snappy", "--sizes", "100,1000", "-d", "uniform",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                codec,
                sizes,
                distribution,
                ..
            } => {
                assert_eq!(codec, "bp32+snappy");
                assert_eq!(sizes, vec![100, 1000]);
                assert_eq!(distribution, Distribution::Uniform);
            }
            _ => panic!("expected run"),
        }
    }
}
