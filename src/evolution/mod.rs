pub mod challenge;
pub mod dispatcher;
pub mod fitness;
pub mod gene_space;
pub mod options;

pub use challenge::{Challenge, Score};
pub use dispatcher::{GenerationFitness, PopulationDispatcher, PopulationFitness};
pub use fitness::{FitnessBreakdown, ScheduleContext, ScheduleFitness};
pub use gene_space::{GeneSpace, GeneVector};
pub use options::{DispatchOptions, DispatchOptionsBuilder};
