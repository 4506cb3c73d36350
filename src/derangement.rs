//! Random derangements (permutations without fixed points).

use rand::Rng;

use crate::error::{BanditError, Result};

/// Draws a uniformly random permutation of `0..n` with no fixed point.
///
/// Uses rejection sampling: a backwards swap pass is abandoned as soon as it
/// would move value `j` into slot `j`, and a completed pass is rejected if
/// slot 0 still holds 0. The expected number of attempts is bounded by `e`.
///
/// # Errors
/// Returns [`BanditError::DerangementTooSmall`] when `n < 2`.
pub fn derangement(n: usize, rng: &mut dyn rand::RngCore) -> Result<Vec<usize>> {
    if n < 2 {
        return Err(BanditError::DerangementTooSmall { n });
    }

    let mut perm: Vec<usize> = Vec::with_capacity(n);
    loop {
        perm.clear();
        perm.extend(0..n);
        if attempt(&mut perm, rng) && perm[0] != 0 {
            return Ok(perm);
        }
    }
}

/// One pass of the construction; `false` if it had to abort.
fn attempt(perm: &mut [usize], rng: &mut dyn rand::RngCore) -> bool {
    for j in (0..perm.len()).rev() {
        let p = rng.random_range(0..=j);
        if perm[p] == j {
            return false;
        }
        perm.swap(j, p);
    }
    true
}

/// Returns true if `perm` is a permutation of `0..perm.len()` without fixed points.
pub fn is_derangement(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        if p == i || p >= perm.len() || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}
