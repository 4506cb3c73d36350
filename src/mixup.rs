//! Mixup data augmentation for bandit feedback.
//!
//! Synthetic samples are convex combinations of a real sample and a partner:
//!
//! ```text
//! x' = w * x + (1 - w) * x_partner
//! r' = w * r + (1 - w) * r_partner
//! ```
//!
//! where `w = max(λ, 1 - λ)` and `λ ~ Beta(α, β)`. The larger weight always
//! goes to the original sample, so a synthetic sample is never closer to its
//! partner than to the sample it was derived from.

use rand_distr::{Beta, Distribution};

use crate::derangement::derangement;
use crate::error::{BanditError, Result};

/// Default Beta parameters for the mixing coefficient (mean ≈ 0.78).
pub const DEFAULT_LAMBDA_ALPHA: f64 = 7.0;
pub const DEFAULT_LAMBDA_BETA: f64 = 2.0;

/// A `(context, reward)` pair, either observed or synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub context: Vec<f64>,
    pub reward: f64,
}

impl Sample {
    pub fn new(context: Vec<f64>, reward: f64) -> Self {
        Self { context, reward }
    }
}

/// Draws mixing coefficients from `Beta(α, β)`.
#[derive(Debug, Clone)]
pub struct LambdaSampler {
    alpha: f64,
    beta: f64,
    dist: Beta<f64>,
}

impl LambdaSampler {
    /// Creates a sampler for `Beta(alpha, beta)`.
    ///
    /// # Errors
    /// Returns [`BanditError::InvalidParameter`] unless both parameters are
    /// finite and positive.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        let dist = Beta::new(alpha, beta).map_err(|e| BanditError::InvalidParameter {
            message: format!("lambda ~ Beta({alpha}, {beta}): {e}"),
        })?;
        Ok(Self { alpha, beta, dist })
    }

    /// Gets the Beta parameters
    pub fn params(&self) -> (f64, f64) {
        (self.alpha, self.beta)
    }

    /// Draws one coefficient in `[0, 1]`.
    pub fn sample(&self, rng: &mut dyn rand::RngCore) -> f64 {
        self.dist.sample(rng)
    }
}

impl Default for LambdaSampler {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_LAMBDA_ALPHA,
            beta: DEFAULT_LAMBDA_BETA,
            dist: Beta::new(DEFAULT_LAMBDA_ALPHA, DEFAULT_LAMBDA_BETA)
                .expect("Beta(7, 2) is a valid distribution"),
        }
    }
}

/// Weight given to the original sample for a drawn `lambda`.
#[inline]
pub fn original_weight(lambda: f64) -> f64 {
    if lambda > 0.5 { lambda } else { 1.0 - lambda }
}

/// Blends `original` towards `partner` with the original-dominant rule.
pub fn blend(original: &Sample, partner: &Sample, lambda: f64) -> Sample {
    let w = original_weight(lambda);
    let context = original
        .context
        .iter()
        .zip(&partner.context)
        .map(|(x, y)| x * w + y * (1.0 - w))
        .collect();
    Sample {
        context,
        reward: original.reward * w + partner.reward * (1.0 - w),
    }
}

/// Mixes a batch with a deranged copy of itself.
///
/// One derangement is drawn for the whole batch and one `λ` per element.
/// Output element `i` is derived from input element `i`.
///
/// # Errors
/// Returns [`BanditError::DerangementTooSmall`] for batches shorter than two.
pub fn mixup(
    batch: &[Sample],
    lambda: &LambdaSampler,
    rng: &mut dyn rand::RngCore,
) -> Result<Vec<Sample>> {
    let partners = derangement(batch.len(), rng)?;
    Ok(batch
        .iter()
        .zip(&partners)
        .map(|(original, &p)| blend(original, &batch[p], lambda.sample(rng)))
        .collect())
}

/// Mixes two batches positionally, `first[i]` with `second[i]`.
///
/// Only the first `min(first.len(), second.len())` elements of each batch take
/// part; `first` is the dominant side of every blend.
pub fn contrast_mixup(
    first: &[Sample],
    second: &[Sample],
    lambda: &LambdaSampler,
    rng: &mut dyn rand::RngCore,
) -> Vec<Sample> {
    first
        .iter()
        .zip(second)
        .map(|(original, partner)| blend(original, partner, lambda.sample(rng)))
        .collect()
}

/// Builds samples from parallel context and reward slices.
///
/// # Errors
/// Returns [`BanditError::BatchMismatch`] if the slices differ in length.
pub fn zip_samples(contexts: &[Vec<f64>], rewards: &[f64]) -> Result<Vec<Sample>> {
    if contexts.len() != rewards.len() {
        return Err(BanditError::BatchMismatch {
            contexts: contexts.len(),
            rewards: rewards.len(),
        });
    }
    Ok(contexts
        .iter()
        .zip(rewards)
        .map(|(c, &r)| Sample::new(c.clone(), r))
        .collect())
}
