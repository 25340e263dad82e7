//! Uniform sampling of sequence names without replacement.

use rand::{SeedableRng, rngs::StdRng, seq::index};

use crate::foundation::error::{ReelError, ReelResult};

/// Check `k` against the number of available sequences.
pub fn validate_sample_size(requested: usize, available: usize) -> ReelResult<()> {
    if requested == 0 || requested > available {
        return Err(ReelError::InvalidSampleSize {
            requested,
            available: Some(available),
        });
    }
    Ok(())
}

/// Choose `k` distinct names uniformly at random, in draw order.
pub fn sample_sequences<R: rand::Rng + ?Sized>(
    names: &[String],
    k: usize,
    rng: &mut R,
) -> ReelResult<Vec<String>> {
    validate_sample_size(k, names.len())?;
    Ok(index::sample(rng, names.len(), k)
        .into_iter()
        .map(|i| names[i].clone())
        .collect())
}

/// Owns the random source used for one run.
pub struct SequenceSampler {
    rng: StdRng,
}

impl SequenceSampler {
    /// Seeded sampler for reproducible selections, or an entropy-seeded one when `seed` is `None`.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn sample(&mut self, names: &[String], k: usize) -> ReelResult<Vec<String>> {
        sample_sequences(names, k, &mut self.rng)
    }
}
