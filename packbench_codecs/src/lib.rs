mod bp32;
mod deflate_codec;
pub mod delta;
mod lz4_codec;
mod packed;
mod passthrough;
mod snappy_codec;
mod varbyte;
mod zstd_codec;

pub use bp32::BinaryPacking;
pub use deflate_codec::DeflateCodec;
pub use delta::{Delta, DeltaBinaryPacking, DeltaVariableByte};
pub use lz4_codec::Lz4Codec;
pub use packed::{Packed, MIN_FRAMED_LEN};
pub use passthrough::PassThrough;
pub use snappy_codec::SnappyCodec;
pub use varbyte::VariableByte;
pub use zstd_codec::ZstdCodec;

use packbench_core::{ByteCodec, Composite, IntegerCodec};

/// Names accepted by [`codec_by_name`].
pub const CODEC_NAMES: &[&str] = &[
    "bp32",
    "varbyte",
    "delta-bp32",
    "delta-varbyte",
    "copy",
    "zstd",
    "lz4",
    "deflate",
    "snappy",
];

/// Names accepted by [`byte_codec_by_name`].
pub const BYTE_CODEC_NAMES: &[&str] = &["zstd", "lz4", "deflate", "snappy"];

/// Resolve a single integer codec from its report name.
pub fn codec_by_name(name: &str) -> anyhow::Result<Box<dyn IntegerCodec>> {
    let codec: Box<dyn IntegerCodec> = match name {
        "bp32" => Box::new(BinaryPacking),
        "varbyte" | "vb" => Box::new(VariableByte),
        "delta-bp32" | "dbp32" => Box::new(DeltaBinaryPacking::new(BinaryPacking)),
        "delta-varbyte" | "dvb" => Box::new(DeltaVariableByte::new(VariableByte)),
        "copy" | "none" => Box::new(PassThrough),
        "zstd" => Box::new(Packed::new(ZstdCodec::default())),
        "lz4" => Box::new(Packed::new(Lz4Codec)),
        "deflate" | "gzip" => Box::new(Packed::new(DeflateCodec::default())),
        "snappy" | "snap" => Box::new(Packed::new(SnappyCodec)),
        other => anyhow::bail!(
            "unknown codec '{}'. Valid options: {}",
            other,
            CODEC_NAMES.join(", ")
        ),
    };
    if codec.name() != name {
        log::debug!("codec alias '{name}' resolved to {}", codec.name());
    }
    Ok(codec)
}

/// Resolve a byte compressor for the byte benchmark.
pub fn byte_codec_by_name(name: &str, zstd_level: i32) -> anyhow::Result<Box<dyn ByteCodec>> {
    match name {
        "zstd" | "z" => Ok(Box::new(ZstdCodec::new(zstd_level))),
        "lz4" | "l" => Ok(Box::new(Lz4Codec)),
        "deflate" | "gzip" => Ok(Box::new(DeflateCodec::default())),
        "snappy" | "snap" => Ok(Box::new(SnappyCodec)),
        other => anyhow::bail!(
            "unknown byte codec '{}'. Valid options: {}",
            other,
            BYTE_CODEC_NAMES.join(", ")
        ),
    }
}

/// Build a composite from a bulk and a remainder codec name.
pub fn composite_by_names(
    bulk: &str,
    remainder: &str,
) -> anyhow::Result<Composite<Box<dyn IntegerCodec>, Box<dyn IntegerCodec>>> {
    Ok(Composite::new(codec_by_name(bulk)?, codec_by_name(remainder)?))
}

/// Parse a `+`-separated chain such as `delta-bp32+delta-varbyte`.
///
/// `a+b+c` nests to the right: `a` is the bulk codec of a composite whose
/// remainder is the composite `b+c`. This mirrors the name a composite
/// reports, so a report name parses back to the same codec.
pub fn parse_chain(chain: &str) -> anyhow::Result<Box<dyn IntegerCodec>> {
    let mut names = chain.rsplit('+').map(str::trim);
    let last = names
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| anyhow::anyhow!("empty codec chain"))?;
    let mut codec = codec_by_name(last)?;
    for name in names {
        codec = Box::new(Composite::new(codec_by_name(name)?, codec));
    }
    Ok(codec)
}
