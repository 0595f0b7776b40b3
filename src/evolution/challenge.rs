use crate::error::Result;

/// Fitness value. Higher is better.
pub type Score = u64;

/// A fitness function over individuals of type `P`.
///
/// Implementations must be pure: the same individual always scores the same, and scoring
/// never mutates shared state, so a single challenge can be shared by every worker.
pub trait Challenge<P> {
    fn score(&self, individual: &P) -> Result<Score>;
}
