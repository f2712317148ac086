//! Evaluate [`Policy`].
use crate::{record::Record, ParallelEnv, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate [`Policy`].
pub trait Evaluator<E: ParallelEnv> {
    /// Evaluate [`Policy`].
    ///
    /// The returned record holds summary statistics of the episodes run with
    /// `policy`.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>;
}
