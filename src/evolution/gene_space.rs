//! # Gene Space
//!
//! What the external optimizer needs to know to produce individuals: how long a gene
//! vector is (one gene per schedulable hour) and which person ids a gene may hold.
//!
//! ## Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use rotagen::evolution::GeneSpace;
//!
//! let space = GeneSpace::new(24, vec![0, 1, 2]).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//! let genes = space.sample(&mut rng);
//!
//! assert_eq!(genes.len(), 24);
//! assert!(space.validate(&genes).is_ok());
//! ```

use std::ops::Deref;

use rand::Rng;

use crate::{
    caching::CacheKey,
    error::{Result, RotaError},
    roster::PersonId,
};

/// One candidate assignment: gene `i` is the person working the `i`-th scheduled hour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneVector(Vec<PersonId>);

impl GeneVector {
    pub fn new(genes: Vec<PersonId>) -> Self {
        Self(genes)
    }

    pub fn into_inner(self) -> Vec<PersonId> {
        self.0
    }
}

impl Deref for GeneVector {
    type Target = [PersonId];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PersonId>> for GeneVector {
    fn from(genes: Vec<PersonId>) -> Self {
        Self(genes)
    }
}

impl FromIterator<PersonId> for GeneVector {
    fn from_iter<I: IntoIterator<Item = PersonId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl CacheKey for GeneVector {
    type Key = [PersonId];

    fn cache_key(&self) -> &Self::Key {
        &self.0
    }
}

/// Length and per-position domain of a gene vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneSpace {
    length: usize,
    domain: Vec<PersonId>,
}

impl GeneSpace {
    /// Every position shares `domain`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the domain is empty.
    pub fn new(length: usize, domain: Vec<PersonId>) -> Result<Self> {
        if domain.is_empty() {
            return Err(RotaError::Configuration(
                "Gene domain cannot be empty".to_string(),
            ));
        }
        Ok(Self { length, domain })
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Valid values of the gene at `position`.
    pub fn domain(&self, _position: usize) -> &[PersonId] {
        &self.domain
    }

    /// Checks length and domain of `genes`.
    pub fn validate(&self, genes: &[PersonId]) -> Result<()> {
        if genes.len() != self.length {
            return Err(RotaError::LengthMismatch {
                expected: self.length,
                actual: genes.len(),
            });
        }
        match genes.iter().find(|&&gene| !self.domain.contains(&gene)) {
            Some(&unknown) => Err(RotaError::UnknownPerson(unknown)),
            None => Ok(()),
        }
    }

    /// Draws a uniformly random gene vector.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> GeneVector {
        (0..self.length)
            .map(|_| self.domain[rng.gen_range(0..self.domain.len())])
            .collect()
    }

    /// Draws `size` random gene vectors, e.g. to seed a first generation.
    pub fn sample_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<GeneVector> {
        (0..size).map(|_| self.sample(rng)).collect()
    }
}
