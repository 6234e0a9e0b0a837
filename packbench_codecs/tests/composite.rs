//! Composite round trips over the bundled codecs.
//!
//! Each test compresses a prefix of a deterministic sequence with a
//! bulk+remainder pair and checks that decompressing with the same element
//! count gives the prefix back exactly.

use packbench_codecs::{
    codec_by_name, composite_by_names, BinaryPacking, DeltaBinaryPacking, DeltaVariableByte,
    PassThrough, VariableByte, BYTE_CODEC_NAMES, MIN_FRAMED_LEN,
};
use packbench_core::harness::{compress, decompress, digest};
use packbench_core::{CodecError, Composite, Cursor, IntegerCodec};

/// Sorted sequence with uneven gaps, generated with a simple LCG.
fn sorted_sequence(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = seed;
    let mut v = 0i32;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            v += 1 + ((rng >> 58) as i32);
            v
        })
        .collect()
}

/// Unsorted values over the whole i32 range.
fn noisy_sequence(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 32) as i32
        })
        .collect()
}

const PAIRS: &[(&str, &str)] = &[
    ("bp32", "varbyte"),
    ("delta-bp32", "delta-varbyte"),
    ("bp32", "copy"),
    ("delta-bp32", "zstd"),
    ("bp32", "lz4"),
    ("delta-bp32", "deflate"),
    ("bp32", "snappy"),
];

fn assert_round_trip(codec: &dyn IntegerCodec, data: &[i32], k: usize) -> Vec<i32> {
    let packed = compress(codec, data, k)
        .unwrap_or_else(|e| panic!("{} k={k}: compress failed: {e}", codec.name()))
        .value;
    let back = decompress(codec, &packed, k)
        .unwrap_or_else(|e| panic!("{} k={k}: decompress failed: {e}", codec.name()))
        .value;
    assert_eq!(back.len(), k, "{} k={k}", codec.name());
    assert_eq!(&back[..], &data[..k], "{} k={k}", codec.name());
    packed
}

#[test]
fn test_round_trip_identity_for_all_pairs() {
    let sorted = sorted_sequence(5_000, 1);
    let noisy = noisy_sequence(5_000, 2);
    for (bulk, rem) in PAIRS {
        let codec = composite_by_names(bulk, rem).unwrap();
        for k in [10, 31, 32, 33, 100, 1_000, 4_999] {
            assert_round_trip(&codec, &sorted, k);
            assert_round_trip(&codec, &noisy, k);
        }
    }
}

#[test]
fn test_single_integer_with_word_level_remainders() {
    // Byte-compressor remainders carry frame overhead that does not fit the
    // 2k-word buffer for k = 1, so only word-level remainders are checked.
    let noisy = noisy_sequence(1, 11);
    for (bulk, rem) in [("bp32", "varbyte"), ("delta-bp32", "delta-varbyte"), ("bp32", "copy")] {
        let codec = composite_by_names(bulk, rem).unwrap();
        assert_round_trip(&codec, &noisy, 1);
    }
}

#[test]
fn test_byte_compressor_codecs_fit_from_min_framed_len() {
    let noisy = noisy_sequence(64, 12);
    for name in BYTE_CODEC_NAMES {
        let codec = codec_by_name(name).unwrap();
        for k in MIN_FRAMED_LEN..=64 {
            assert_round_trip(codec.as_ref(), &noisy, k);
        }
        let err = compress(codec.as_ref(), &noisy, 1).unwrap_err();
        assert!(matches!(err, CodecError::OutputTooSmall { .. }), "{name}: {err}");
    }
}

#[test]
fn test_every_length_up_to_three_blocks() {
    let data = sorted_sequence(96, 9);
    let codec = Composite::new(DeltaBinaryPacking::new(BinaryPacking), DeltaVariableByte::new(VariableByte));
    for k in 1..=96 {
        assert_round_trip(&codec, &data, k);
    }
}

#[test]
fn test_hundred_integers_use_both_segments() {
    // PassThrough spends one word per value, so whatever follows the three
    // bp32 blocks is exactly the 4-integer remainder.
    let data = noisy_sequence(100, 3);
    let codec = Composite::new(BinaryPacking, PassThrough);
    let packed = assert_round_trip(&codec, &data, 100);
    let bulk_words: usize = packed_block_words(&packed, 3);
    assert_eq!(packed.len(), bulk_words + 4);
}

/// Sum of header + body words of the first `blocks` bp32 blocks.
fn packed_block_words(packed: &[i32], blocks: usize) -> usize {
    let mut pos = 0;
    for _ in 0..blocks {
        pos += 1 + packed[pos] as usize;
    }
    pos
}

#[test]
fn test_aligned_input_is_pure_bulk() {
    let data = sorted_sequence(64, 4);
    let composite = Composite::new(BinaryPacking, VariableByte);
    let via_composite = compress(&composite, &data, 64).unwrap().value;
    let via_bulk = compress(&BinaryPacking, &data, 64).unwrap().value;
    assert_eq!(via_composite, via_bulk);
}

#[test]
fn test_short_input_is_pure_remainder() {
    let data = sorted_sequence(10, 5);
    let composite = Composite::new(BinaryPacking, VariableByte);
    let via_composite = compress(&composite, &data, 10).unwrap().value;
    let via_rem = compress(&VariableByte, &data, 10).unwrap().value;
    assert_eq!(via_composite, via_rem);
}

#[test]
fn test_compression_is_deterministic() {
    let data = sorted_sequence(10_000, 6);
    for (bulk, rem) in PAIRS {
        let codec = composite_by_names(bulk, rem).unwrap();
        let a = compress(&codec, &data, 9_999).unwrap().value;
        let b = compress(&codec, &data, 9_999).unwrap().value;
        assert_eq!(a, b, "{bulk}+{rem}");
        assert_eq!(digest(&a), digest(&b));
    }
}

#[test]
fn test_delta_pair_beats_plain_pair_on_sorted_data() {
    let data = sorted_sequence(10_000, 7);
    let plain = composite_by_names("bp32", "varbyte").unwrap();
    let delta = composite_by_names("delta-bp32", "delta-varbyte").unwrap();
    let p = compress(&plain, &data, 10_000).unwrap().value.len();
    let d = compress(&delta, &data, 10_000).unwrap().value.len();
    assert!(d < p, "delta {d} words vs plain {p} words");
}

#[test]
fn test_cursor_stays_within_output_buffer() {
    let data = noisy_sequence(1_000, 8);
    let codec = composite_by_names("bp32", "varbyte").unwrap();
    for k in [1, 7, 32, 100, 999] {
        let mut out = vec![0i32; 2 * k];
        let p = codec
            .compress(&data, Cursor::new(), k, &mut out, Cursor::new())
            .unwrap();
        assert_eq!(p.input.value(), k);
        assert!(p.output.value() <= out.len());
        assert!(p.output.value() > 0);
    }
}

#[test]
fn test_undersized_output_reports_codec_error() {
    let data = noisy_sequence(64, 10);
    let codec = Composite::new(BinaryPacking, VariableByte);
    let mut out = vec![0i32; 40];
    let err = codec
        .compress(&data, Cursor::new(), 64, &mut out, Cursor::new())
        .unwrap_err();
    assert!(matches!(err, CodecError::OutputTooSmall { ref codec, .. } if codec == "bp32"));
}

/// Only one compress/decompress pair is guaranteed. Compressing the
/// compressed words again and unwinding both layers with the original
/// element count is out of contract and must not be mistaken for a round trip.
#[test]
fn test_double_compression_is_out_of_contract() {
    let data: Vec<i32> = (0..100).map(|i| i * 3).collect();
    let codec = Composite::new(BinaryPacking, VariableByte);

    let once = compress(&codec, &data, 100).unwrap().value;
    assert_ne!(once.len(), 100);
    let twice = compress(&codec, &once, once.len()).unwrap().value;

    let outcome = decompress(&codec, &twice, 100)
        .and_then(|inner| decompress(&codec, &inner.value, 100));
    assert!(
        !matches!(outcome, Ok(ref v) if v.value == data),
        "double decompression with the outer count must not reproduce the input"
    );

    // The single pair still holds.
    assert_eq!(decompress(&codec, &once, 100).unwrap().value, data);
}
