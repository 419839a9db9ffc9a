//! Injected randomness
//!
//! Every stage draws through [`UniformSource`], so a run is reproducible from a
//! seeded `StdRng` and tests can force exact outcomes with [`ScriptedSource`].

use rand::{Rng, RngCore};

use crate::vs_error::{SimError, SimResult};

/// Source of independent uniform floats in [0, 1)
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore> UniformSource for R {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
    drawn: usize,
}

impl ScriptedSource {
    /// Values must lie in [0, 1) and the list must not be empty
    pub fn new(values: Vec<f64>) -> SimResult<Self> {
        if values.is_empty() {
            return Err(SimError::config("scripted source needs at least one value"));
        }
        if let Some(bad) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(SimError::config(format!(
                "scripted draw {} outside [0, 1)",
                bad
            )));
        }
        Ok(Self {
            values,
            cursor: 0,
            drawn: 0,
        })
    }

    /// Source that always returns the same value
    pub fn constant(value: f64) -> SimResult<Self> {
        Self::new(vec![value])
    }

    /// Number of draws taken so far
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.drawn += 1;
        value
    }
}

/// Sample `k` distinct items from `candidates`, uniformly without replacement.
///
/// Partial Fisher-Yates: one draw per selected item, each subset of size `k`
/// equally likely. The result is in selection order.
///
/// `SliceRandom::choose_multiple` needs an `Rng`; this consumes only uniform
/// floats, so a [`ScriptedSource`] fixes the sample exactly.
pub fn sample_distinct<T: Copy, S: UniformSource + ?Sized>(
    candidates: &[T],
    k: usize,
    rng: &mut S,
) -> SimResult<Vec<T>> {
    let n = candidates.len();
    if k > n {
        return Err(SimError::config(format!(
            "cannot sample {} distinct items from {}",
            k, n
        )));
    }

    let mut pool = candidates.to_vec();
    for i in 0..k {
        let remaining = n - i;
        // u < 1 keeps the offset below `remaining`; the min guards float rounding
        let offset = ((rng.next_uniform() * remaining as f64) as usize).min(remaining - 1);
        pool.swap(i, i + offset);
    }
    pool.truncate(k);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_scripted_source_cycles() {
        let mut src = ScriptedSource::new(vec![0.1, 0.5, 0.9]).unwrap();
        let draws: Vec<f64> = (0..5).map(|_| src.next_uniform()).collect();
        assert_eq!(draws, vec![0.1, 0.5, 0.9, 0.1, 0.5]);
        assert_eq!(src.drawn(), 5);
    }

    #[test]
    fn test_scripted_source_rejects_bad_values() {
        assert!(ScriptedSource::new(vec![]).is_err());
        assert!(ScriptedSource::new(vec![1.0]).is_err());
        assert!(ScriptedSource::new(vec![-0.1]).is_err());
    }

    #[test]
    fn test_std_rng_in_range() {
        let mut rng = StdRng::from_seed([3u8; 32]);
        for _ in 0..1000 {
            let u = rng.next_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_sample_distinct_no_duplicates() {
        let mut rng = StdRng::from_seed([0u8; 32]);
        let candidates: Vec<usize> = (0..100).collect();

        for k in [0, 1, 10, 50, 100] {
            let sample = sample_distinct(&candidates, k, &mut rng).unwrap();
            assert_eq!(sample.len(), k);
            let unique: HashSet<_> = sample.iter().collect();
            assert_eq!(unique.len(), k);
        }
    }

    #[test]
    fn test_sample_distinct_scripted_selection() {
        // offsets: 0 -> picks 0, floor(0.15*9)=1 -> picks 2, floor(0.4*8)=3 -> picks 5
        let mut src = ScriptedSource::new(vec![0.0, 0.15, 0.4]).unwrap();
        let candidates: Vec<usize> = (0..10).collect();
        let sample = sample_distinct(&candidates, 3, &mut src).unwrap();
        assert_eq!(sample, vec![0, 2, 5]);
    }

    #[test]
    fn test_sample_distinct_upper_draw_stays_in_bounds() {
        let mut src = ScriptedSource::constant(0.999_999_999).unwrap();
        let candidates: Vec<usize> = (0..4).collect();
        let sample = sample_distinct(&candidates, 4, &mut src).unwrap();
        let unique: HashSet<_> = sample.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_sample_distinct_too_many() {
        let mut rng = StdRng::from_seed([0u8; 32]);
        let err = sample_distinct(&[1, 2, 3], 4, &mut rng).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_sample_distinct_roughly_uniform() {
        let mut rng = StdRng::from_seed([9u8; 32]);
        let candidates: Vec<usize> = (0..5).collect();
        let mut hits = [0usize; 5];
        for _ in 0..5000 {
            for picked in sample_distinct(&candidates, 2, &mut rng).unwrap() {
                hits[picked] += 1;
            }
        }
        // expected 2000 each
        for count in hits {
            assert!(count > 1800 && count < 2200, "count {} out of range", count);
        }
    }
}
