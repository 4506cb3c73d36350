//! Decision algorithms that can be driven by the replay harness.
//!
//! Context-free agents ignore the context; linear agents keep one
//! [`RidgeRegression`](crate::RidgeRegression) per action.

mod epsilon_greedy;
mod linucb;
mod lints;
mod uniform;

pub use epsilon_greedy::EpsilonGreedy;
pub use linucb::LinUcb;
pub use lints::LinTs;
pub use uniform::Uniform;

use crate::error::{BanditError, Result};

fn check_action(action: usize, num_actions: usize) -> Result<()> {
    if action >= num_actions {
        return Err(BanditError::ActionOutOfRange {
            action,
            num_actions,
        });
    }
    Ok(())
}

fn check_context(context: &[f64], num_features: usize) -> Result<()> {
    if context.len() != num_features {
        return Err(BanditError::InvalidContextDimensions {
            expected: num_features,
            got: context.len(),
        });
    }
    Ok(())
}

fn check_num_actions(num_actions: usize) -> Result<()> {
    if num_actions == 0 {
        return Err(BanditError::InvalidParameter {
            message: "an agent needs at least one action".to_string(),
        });
    }
    Ok(())
}
