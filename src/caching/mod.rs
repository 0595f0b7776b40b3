//! # Caching Module
//!
//! Fitness reuse across generations. Individuals carried over unchanged from the previous
//! generation's parents keep the fitness they were given then; only new individuals are
//! sent to the evaluator.
//!
//! The cache is keyed by the individual's content rather than found by scanning the
//! parents, so a lookup is a single hash lookup. Keys are borrowed from the parents and from the
//! individual being looked up; nothing is copied. The cache is rebuilt from scratch every
//! generation on the dispatching thread and only read afterwards.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Result, RotaError};
use crate::evolution::Score;

/// A trait for individuals that can be used as cache keys.
///
/// Individuals with equal keys must have equal fitness.
pub trait CacheKey {
    /// The type of the cache key, usually a view of the individual's own data.
    type Key: ?Sized + Eq + Hash + Debug;

    /// Borrows the cache key of this individual.
    fn cache_key(&self) -> &Self::Key;
}

/// The previous generation's parents and the fitness they were scored with, aligned 1:1.
#[derive(Debug)]
pub struct PriorGeneration<'a, P> {
    parents: &'a [P],
    fitness: &'a [Score],
}

impl<'a, P> PriorGeneration<'a, P> {
    /// Pairs parents with their fitness values.
    ///
    /// # Errors
    ///
    /// Returns `PriorGeneration` if the two slices differ in length.
    pub fn new(parents: &'a [P], fitness: &'a [Score]) -> Result<Self> {
        if parents.len() != fitness.len() {
            return Err(RotaError::PriorGeneration {
                parents: parents.len(),
                fitness: fitness.len(),
            });
        }
        Ok(Self { parents, fitness })
    }

    pub fn parents(&self) -> &'a [P] {
        self.parents
    }

    pub fn fitness(&self) -> &'a [Score] {
        self.fitness
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Content-keyed fitness of one generation's parents.
#[derive(Debug)]
pub struct ParentCache<'a, P>
where
    P: CacheKey,
{
    entries: HashMap<&'a P::Key, Score>,
}

impl<'a, P> ParentCache<'a, P>
where
    P: CacheKey,
{
    /// Creates an empty cache, as used for the first generation.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds the cache from the prior generation.
    ///
    /// When several parents share a key, the first one in parent order wins.
    pub fn from_prior(prior: &PriorGeneration<'a, P>) -> Self {
        let mut entries = HashMap::with_capacity(prior.len());
        for (parent, &fitness) in prior.parents().iter().zip(prior.fitness()) {
            entries.entry(parent.cache_key()).or_insert(fitness);
        }
        Self { entries }
    }

    /// Builds the cache from an optional prior generation.
    pub fn build(prior: Option<&PriorGeneration<'a, P>>) -> Self {
        prior.map_or_else(Self::empty, Self::from_prior)
    }

    /// Gets the cached fitness of `individual`, if it matches a parent.
    pub fn get(&self, individual: &P) -> Option<Score> {
        self.entries.get(individual.cache_key()).copied()
    }

    /// Returns the number of distinct cached individuals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P> Default for ParentCache<'_, P>
where
    P: CacheKey,
{
    fn default() -> Self {
        Self::empty()
    }
}
