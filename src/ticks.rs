// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Axis tick generation.
//!
//! Ticks are stepped in a fixed-point domain of tenths so that fractional
//! steps like `0.5` never accumulate floating point error.

use crate::Error;

/// number of fixed-point units per axis unit
const SCALE: f64 = 10.0;

/// bounds beyond this magnitude do not fit the fixed-point domain
const MAX_BOUND: f64 = 1e15;

/// upper limit on ticks per axis, longer sequences are truncated
pub const MAX_TICKS: usize = 10_000;

/// representation error, in units of the last place, absorbed when
/// truncating the observed maximum, eg: `2.3 * 10.0 == 22.999999999999996`
const ULPS: f64 = 4.0;

/// Returns `min, min + step, min + 2 * step, ...` up to and including the
/// largest value that does not exceed `max`. An empty sequence is returned
/// when `max` is below `min`. Sequences longer than `MAX_TICKS` keep their
/// first `MAX_TICKS` values.
pub fn ticks(min: f64, max: f64, step: f64) -> Result<Vec<f64>, Error> {
    for bound in &[min, max] {
        if !bound.is_finite() || bound.abs() > MAX_BOUND {
            return Err(Error::InvalidBound(*bound));
        }
    }
    if !step.is_finite() {
        return Err(Error::InvalidStep(step));
    }

    let scaled_min = (min * SCALE).round() as i64;
    let scaled_step = (step * SCALE).round() as i64;
    let scaled = max * SCALE;
    let scaled_max = (scaled + scaled.abs() * ULPS * f64::EPSILON).floor() as i64;

    if scaled_step <= 0 {
        return Err(Error::InvalidStep(step));
    }

    if scaled_max < scaled_min {
        return Ok(Vec::new());
    }

    let count = (scaled_max - scaled_min) / scaled_step + 1;
    if count > MAX_TICKS as i64 {
        warn!(
            "axis from {} to {} by {} needs {} ticks, keeping the first {}",
            min, max, step, count, MAX_TICKS
        );
    }

    Ok((0..count.min(MAX_TICKS as i64))
        .map(|k| (scaled_min + k * scaled_step) as f64 / SCALE)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn fractional_step() {
        assert_eq!(ticks(0.0, 2.1, 0.5).unwrap(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn integer_step() {
        assert_eq!(
            ticks(0.0, 237.0, 50.0).unwrap(),
            vec![0.0, 50.0, 100.0, 150.0, 200.0]
        );
    }

    #[test]
    fn max_on_a_tick_is_included() {
        assert_eq!(ticks(2.0, 10.0, 2.0).unwrap(), vec![2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(0.0, 0.7, 0.1).unwrap().len(), 8);
    }

    #[test]
    fn offset_min() {
        // the sequence is anchored at min, not at multiples of step
        assert_eq!(ticks(1.0, 9.0, 4.0).unwrap(), vec![1.0, 5.0, 9.0]);
        assert_eq!(ticks(20.0, 95.0, 20.0).unwrap(), vec![20.0, 40.0, 60.0, 80.0]);
    }

    #[test]
    fn max_below_min_is_empty() {
        assert!(ticks(2.0, 1.5, 2.0).unwrap().is_empty());
        assert!(ticks(20.0, 0.0, 20.0).unwrap().is_empty());
    }

    #[test]
    fn max_equal_to_min() {
        assert_eq!(ticks(2.0, 2.0, 2.0).unwrap(), vec![2.0]);
    }

    #[test]
    fn negative_range() {
        assert_eq!(ticks(-1.0, 0.6, 0.5).unwrap(), vec![-1.0, -0.5, 0.0, 0.5]);
    }

    #[test]
    fn bad_steps() {
        assert!(matches!(ticks(0.0, 1.0, 0.0), Err(Error::InvalidStep(_))));
        assert!(matches!(ticks(0.0, 1.0, -1.0), Err(Error::InvalidStep(_))));
        // rounds to zero tenths
        assert!(matches!(ticks(0.0, 1.0, 0.04), Err(Error::InvalidStep(_))));
        assert!(matches!(ticks(0.0, 1.0, f64::NAN), Err(Error::InvalidStep(_))));
    }

    #[test]
    fn long_sequences_are_truncated() {
        let t = ticks(0.0, 600_000.0, 5.0).unwrap();
        assert_eq!(t.len(), MAX_TICKS);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[MAX_TICKS - 1], (MAX_TICKS - 1) as f64 * 5.0);

        assert_eq!(ticks(0.0, 1e9, 0.1).unwrap().len(), MAX_TICKS);
    }

    #[test]
    fn max_just_below_a_tick() {
        assert_eq!(ticks(0.0, 0.69999999999, 0.1).unwrap().last(), Some(&0.6));
        assert_eq!(ticks(0.0, 2.3, 0.1).unwrap().last(), Some(&2.3));
        assert_eq!(ticks(0.0, 2.29999999, 0.1).unwrap().last(), Some(&2.2));
    }

    #[test]
    fn bad_bounds() {
        assert!(matches!(
            ticks(0.0, f64::INFINITY, 1.0),
            Err(Error::InvalidBound(_))
        ));
        assert!(matches!(ticks(f64::NAN, 1.0, 1.0), Err(Error::InvalidBound(_))));
    }

    #[test]
    fn deterministic() {
        let a = ticks(2.0, 13.37, 0.5).unwrap();
        let b = ticks(2.0, 13.37, 0.5).unwrap();
        let a: Vec<u64> = a.iter().map(|t| t.to_bits()).collect();
        let b: Vec<u64> = b.iter().map(|t| t.to_bits()).collect();
        assert_eq!(a, b);
    }

    // inputs are whole tenths so every bound is representable in the
    // fixed-point domain
    #[quickcheck]
    fn evenly_spaced_and_bounded(min: i16, span: u16, extra: u8, step: u8) -> bool {
        let min = min as f64 / SCALE;
        let step = (step as f64 + 1.0) / SCALE;
        let max = min + span as f64 / SCALE + (extra % 10) as f64 / 100.0;

        let ticks = match ticks(min, max, step) {
            Ok(ticks) => ticks,
            Err(_) => return false,
        };

        let last = match ticks.last() {
            Some(last) => *last,
            None => return false,
        };

        let truncated = ticks.len() == MAX_TICKS;

        (ticks[0] - min).abs() < TOLERANCE
            && ticks
                .windows(2)
                .all(|w| w[1] > w[0] && ((w[1] - w[0]) - step).abs() < TOLERANCE)
            && last <= max + TOLERANCE
            && (truncated || max < last + step)
    }

    #[quickcheck]
    fn below_min_is_always_empty(min: i16, gap: u16, step: u8) -> bool {
        let min = min as f64 / SCALE;
        let max = min - (gap as f64 + 1.0) / SCALE;
        let step = (step as f64 + 1.0) / SCALE;

        ticks(min, max, step).map(|t| t.is_empty()).unwrap_or(false)
    }
}
