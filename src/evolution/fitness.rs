//! # Schedule Fitness
//!
//! The scalar objective the optimizer maximizes: the summed value of every satisfied
//! constraint plus the contiguity bonus.
//!
//! `ScheduleContext` holds everything fixed for a run (the hours a gene vector indexes,
//! the roster, the constraints, the date window and the bonus configuration).
//! `ScheduleFitness` shares it behind an `Arc`, so cloning the evaluator into each worker
//! is cheap and no worker can mutate what the others read.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rotagen::{
//!     constraints::{ConstraintSet, ScheduledHoursConstraint},
//!     contiguity::ContiguityBonus,
//!     evolution::{ScheduleContext, ScheduleFitness},
//!     roster::{Person, Roster},
//!     time_grid::ScheduleWindow,
//! };
//!
//! let roster = Roster::new(vec![Person::new(0, "Ada", 40, 8)]).unwrap();
//! let constraints = ConstraintSet::builder()
//!     .with_constraint(ScheduledHoursConstraint::new("9:00-9:00", "Mon-Mon").unwrap())
//!     .build();
//! let window = ScheduleWindow::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
//! );
//!
//! let context =
//!     ScheduleContext::from_constraints(roster, constraints, window, ContiguityBonus::default())
//!         .unwrap();
//! let fitness = ScheduleFitness::new(context);
//!
//! assert_eq!(fitness.fitness(&[0]).unwrap(), 100);
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    constraints::{ConstraintSet, ConstraintVerdict},
    contiguity::ContiguityBonus,
    error::{Result, RotaError},
    roster::{PersonId, Roster},
    solution::Solution,
    time_grid::{group_by_day, HourSlot, ScheduleWindow},
};

use super::{challenge::Challenge, gene_space::GeneSpace, GeneVector, Score};

/// The fixed inputs of a run.
#[derive(Debug)]
pub struct ScheduleContext {
    hours: Vec<HourSlot>,
    roster: Roster,
    constraints: ConstraintSet,
    window: ScheduleWindow,
    contiguity: ContiguityBonus,
}

impl ScheduleContext {
    /// Creates a context over an explicit, strictly ascending list of hours.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the roster is empty or larger than the bonus table allows.
    /// - `NotAscending` if `hours` is not strictly ascending.
    pub fn new(
        hours: Vec<HourSlot>,
        roster: Roster,
        constraints: ConstraintSet,
        window: ScheduleWindow,
        contiguity: ContiguityBonus,
    ) -> Result<Self> {
        if roster.is_empty() {
            return Err(RotaError::Configuration(
                "Roster cannot be empty".to_string(),
            ));
        }
        contiguity.validate_roster(roster.len())?;
        if let Some(position) = hours.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(RotaError::NotAscending {
                position: position + 1,
            });
        }

        info!(
            hours = hours.len(),
            people = roster.len(),
            constraints = constraints.len(),
            from = %window.from,
            to = %window.to,
            "schedule context ready"
        );

        Ok(Self {
            hours,
            roster,
            constraints,
            window,
            contiguity,
        })
    }

    /// Creates a context whose hours are the union of the coverage constraints' hours
    /// inside `window`.
    pub fn from_constraints(
        roster: Roster,
        constraints: ConstraintSet,
        window: ScheduleWindow,
        contiguity: ContiguityBonus,
    ) -> Result<Self> {
        let hours = constraints.hours_to_schedule(&window);
        Self::new(hours, roster, constraints, window, contiguity)
    }

    /// Decodes `genes` against the scheduled hours.
    pub fn solution(&self, genes: &[PersonId]) -> Result<Solution<'_>> {
        Solution::new(
            &self.hours,
            genes,
            &self.roster,
            &self.constraints,
            self.window,
        )
    }

    /// Length and domain of the gene vectors this context scores.
    pub fn gene_space(&self) -> Result<GeneSpace> {
        GeneSpace::new(self.hours.len(), self.roster.ids())
    }

    /// Upper bound on fitness: every constraint satisfied and one person on every day.
    pub fn max_fitness(&self) -> Score {
        let days = group_by_day(self.hours.iter().copied()).len();
        let best_day = self
            .contiguity
            .table()
            .get(self.roster.len().saturating_sub(1))
            .copied()
            .unwrap_or(0);
        self.constraints.max_value() + best_day * days as Score
    }

    pub fn hours(&self) -> &[HourSlot] {
        &self.hours
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn window(&self) -> &ScheduleWindow {
        &self.window
    }

    pub fn contiguity(&self) -> &ContiguityBonus {
        &self.contiguity
    }
}

/// Per-part account of one individual's fitness.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessBreakdown {
    pub verdicts: Vec<ConstraintVerdict>,
    pub constraint_score: Score,
    pub contiguity_bonus: Score,
    pub total: Score,
}

/// Fitness function over gene vectors.
#[derive(Debug, Clone)]
pub struct ScheduleFitness {
    context: Arc<ScheduleContext>,
}

impl ScheduleFitness {
    pub fn new(context: ScheduleContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    pub fn from_shared(context: Arc<ScheduleContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ScheduleContext {
        &self.context
    }

    /// Scores one gene vector.
    pub fn fitness(&self, genes: &[PersonId]) -> Result<Score> {
        let solution = self.context.solution(genes)?;
        let constraint_score = self.context.constraints.satisfied_value(&solution);
        let bonus = solution.contiguity_bonus(&self.context.contiguity)?;
        Ok(constraint_score + bonus)
    }

    /// Scores one gene vector and reports every constraint's verdict.
    pub fn explain(&self, genes: &[PersonId]) -> Result<FitnessBreakdown> {
        let solution = self.context.solution(genes)?;
        let verdicts = self.context.constraints.verdicts(&solution);
        let constraint_score: Score = verdicts.iter().map(ConstraintVerdict::contribution).sum();
        let contiguity_bonus = solution.contiguity_bonus(&self.context.contiguity)?;
        debug!(constraint_score, contiguity_bonus, "fitness explained");
        Ok(FitnessBreakdown {
            verdicts,
            constraint_score,
            contiguity_bonus,
            total: constraint_score + contiguity_bonus,
        })
    }
}

impl Challenge<GeneVector> for ScheduleFitness {
    fn score(&self, individual: &GeneVector) -> Result<Score> {
        self.fitness(individual)
    }
}
