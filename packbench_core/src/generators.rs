//! Synthetic sorted integer sequences for feeding benchmarks.
//!
//! Both generators return `n` distinct values in `[0, max)` in increasing
//! order. `uniform` spreads them evenly at random; `clustered` recursively
//! splits the range so that dense runs alternate with sparse gaps, which is
//! the shape delta-based codecs are built for.

use rand::seq::index;
use rand::Rng;

use crate::error::GeneratorError;

fn check(n: usize, max: usize) -> Result<(), GeneratorError> {
    if max > i32::MAX as usize {
        return Err(GeneratorError::RangeTooLarge { max });
    }
    if n > max {
        return Err(GeneratorError::RangeTooSmall { n, max });
    }
    Ok(())
}

/// `n` distinct sorted values drawn uniformly from `[0, max)`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, n: usize, max: usize) -> Result<Vec<i32>, GeneratorError> {
    check(n, max)?;
    let mut out = vec![0i32; n];
    fill_uniform(rng, &mut out, 0, max);
    Ok(out)
}

/// `n` distinct sorted values from `[0, max)` with clustered gaps.
pub fn clustered<R: Rng + ?Sized>(rng: &mut R, n: usize, max: usize) -> Result<Vec<i32>, GeneratorError> {
    check(n, max)?;
    let mut out = vec![0i32; n];
    fill_clustered(rng, &mut out, 0, max);
    Ok(out)
}

fn fill_uniform<R: Rng + ?Sized>(rng: &mut R, out: &mut [i32], min: usize, max: usize) {
    let range = max - min;
    if out.len() == range {
        for (slot, v) in out.iter_mut().zip(min..max) {
            *slot = v as i32;
        }
        return;
    }
    let mut picks = index::sample(rng, range, out.len()).into_vec();
    picks.sort_unstable();
    for (slot, p) in out.iter_mut().zip(picks) {
        *slot = (min + p) as i32;
    }
}

fn fill_clustered<R: Rng + ?Sized>(rng: &mut R, out: &mut [i32], min: usize, max: usize) {
    let len = out.len();
    let range = max - min;
    if range == len || len <= 10 {
        fill_uniform(rng, out, min, max);
        return;
    }

    let slack = range.saturating_sub(len + 1);
    let cut = len / 2 + if slack > 0 { rng.gen_range(0..slack) } else { 0 };
    let p: f64 = rng.gen();
    let (lo, hi) = out.split_at_mut(len / 2);

    if p < 0.25 {
        fill_uniform(rng, lo, min, min + cut);
        fill_clustered(rng, hi, min + cut, max);
    } else if p < 0.5 {
        fill_clustered(rng, lo, min, min + cut);
        fill_uniform(rng, hi, min + cut, max);
    } else {
        fill_clustered(rng, lo, min, min + cut);
        fill_clustered(rng, hi, min + cut, max);
    }
}
