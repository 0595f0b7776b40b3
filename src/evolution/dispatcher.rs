//! # Population Dispatcher
//!
//! Scores a whole generation at once. Individuals identical to one of the previous
//! generation's parents reuse the parent's fitness; the rest are scored on a worker pool
//! and the results are reassembled in population order.
//!
//! A dispatch is synchronous for the caller: it returns only once every individual has a
//! fitness value, or fails as a whole if any evaluation fails.
//!
//! ## Example
//!
//! ```rust
//! use rotagen::{
//!     caching::PriorGeneration,
//!     error::Result,
//!     evolution::{Challenge, DispatchOptions, GeneVector, PopulationDispatcher, Score},
//! };
//!
//! #[derive(Clone)]
//! struct GeneSum;
//!
//! impl Challenge<GeneVector> for GeneSum {
//!     fn score(&self, individual: &GeneVector) -> Result<Score> {
//!         Ok(individual.iter().map(|&gene| gene as Score).sum())
//!     }
//! }
//!
//! let dispatcher = PopulationDispatcher::with_options(GeneSum, &DispatchOptions::default())?;
//!
//! let first = vec![GeneVector::new(vec![1, 2]), GeneVector::new(vec![3, 4])];
//! let scored = dispatcher.evaluate(&first, None)?;
//! assert_eq!(scored.scores, vec![3, 7]);
//!
//! let prior = PriorGeneration::new(&first, &scored.scores)?;
//! let second = vec![GeneVector::new(vec![3, 4]), GeneVector::new(vec![0, 0])];
//! let scored = dispatcher.evaluate(&second, Some(&prior))?;
//! assert_eq!(scored.scores, vec![7, 0]);
//! assert_eq!((scored.reused, scored.evaluated), (1, 1));
//! # Ok::<(), rotagen::error::RotaError>(())
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, instrument, trace};

use crate::{
    caching::{CacheKey, ParentCache, PriorGeneration},
    error::{OptionExt, Result, RotaError},
};

use super::{
    challenge::Challenge,
    options::{DispatchOptions, DEFAULT_PARALLEL_THRESHOLD},
    Score,
};

/// Fitness of one generation, aligned with the population it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFitness {
    /// One score per individual, in population order.
    pub scores: Vec<Score>,
    /// Individuals whose score was taken from a matching parent.
    pub reused: usize,
    /// Individuals sent to the evaluator.
    pub evaluated: usize,
}

impl GenerationFitness {
    /// Index and score of the fittest individual; the first one wins ties.
    pub fn best(&self) -> Option<(usize, Score)> {
        self.scores
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (index, score)| match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((index, score)),
            })
    }
}

/// The seam an external optimizer calls once per generation.
pub trait PopulationFitness<P> {
    fn population_fitness(
        &self,
        population: &[P],
        prior: Option<&PriorGeneration<'_, P>>,
    ) -> Result<GenerationFitness>;
}

/// Scores populations on an injected worker pool, reusing parent fitness.
#[derive(Debug, Clone)]
pub struct PopulationDispatcher<P, C>
where
    C: Challenge<P>,
{
    challenge: C,
    pool: Arc<ThreadPool>,
    parallel_threshold: usize,
    _marker: PhantomData<fn(&P)>,
}

impl<P, C> PopulationDispatcher<P, C>
where
    P: CacheKey + Sync,
    C: Challenge<P> + Send + Sync,
{
    /// Creates a dispatcher that scores on `pool`, with the default parallel threshold.
    pub fn new(challenge: C, pool: Arc<ThreadPool>) -> Self {
        Self {
            challenge,
            pool,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            _marker: PhantomData,
        }
    }

    /// Creates a dispatcher with its own pool built from `options`.
    pub fn with_options(challenge: C, options: &DispatchOptions) -> Result<Self> {
        let pool = options.build_pool()?;
        Ok(Self::new(challenge, pool).with_parallel_threshold(options.get_parallel_threshold()))
    }

    /// Batches smaller than `threshold` are scored on the calling thread.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn challenge(&self) -> &C {
        &self.challenge
    }

    pub fn pool(&self) -> &Arc<ThreadPool> {
        &self.pool
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Computes the fitness of every individual in `population`.
    ///
    /// # Errors
    ///
    /// Returns `Evaluation`, carrying the population index, if any individual fails to
    /// score. No partial result is returned.
    #[instrument(level = "debug", skip_all, fields(population = population.len()))]
    pub fn evaluate(
        &self,
        population: &[P],
        prior: Option<&PriorGeneration<'_, P>>,
    ) -> Result<GenerationFitness> {
        let cache = ParentCache::build(prior);

        let mut scores: Vec<Option<Score>> = Vec::with_capacity(population.len());
        let mut pending: Vec<(usize, &P)> = Vec::new();
        for (index, individual) in population.iter().enumerate() {
            let cached = cache.get(individual);
            if cached.is_none() {
                pending.push((index, individual));
            }
            scores.push(cached);
        }
        let evaluated = pending.len();
        let reused = population.len() - evaluated;
        trace!(cached = cache.len(), reused, evaluated, "parent cache applied");

        let computed = if evaluated >= self.parallel_threshold {
            self.pool.install(|| {
                pending
                    .par_iter()
                    .map(|&(index, individual)| self.score_one(index, individual))
                    .collect::<Result<Vec<_>>>()
            })?
        } else {
            pending
                .iter()
                .map(|&(index, individual)| self.score_one(index, individual))
                .collect::<Result<Vec<_>>>()?
        };
        for (score, index) in computed {
            scores[index] = Some(score);
        }

        let scores = scores
            .into_iter()
            .enumerate()
            .map(|(index, score)| {
                score.ok_or_else_rota(|| {
                    RotaError::Other(format!("no fitness recorded for individual {}", index))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(reused, evaluated, "generation scored");
        Ok(GenerationFitness {
            scores,
            reused,
            evaluated,
        })
    }

    fn score_one(&self, index: usize, individual: &P) -> Result<(Score, usize)> {
        self.challenge
            .score(individual)
            .map(|score| (score, index))
            .map_err(|source| RotaError::Evaluation {
                index,
                source: Box::new(source),
            })
    }
}

impl<P, C> PopulationFitness<P> for PopulationDispatcher<P, C>
where
    P: CacheKey + Sync,
    C: Challenge<P> + Send + Sync,
{
    fn population_fitness(
        &self,
        population: &[P],
        prior: Option<&PriorGeneration<'_, P>>,
    ) -> Result<GenerationFitness> {
        self.evaluate(population, prior)
    }
}
