pub mod caching;
pub mod constraints;
pub mod contiguity;
pub mod error;
pub mod evolution;
pub mod roster;
pub mod solution;
pub mod time_grid;

// Re-export commonly used types for convenience
pub use error::{OptionExt, Result, RotaError};
pub use evolution::{
    Challenge, GeneVector, PopulationDispatcher, PopulationFitness, ScheduleContext,
    ScheduleFitness, Score,
};
