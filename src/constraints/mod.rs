//! # Constraints Module
//!
//! Weighted soft rules a rota is scored against. Each constraint gives a yes/no verdict on a
//! [`Solution`] and carries a fixed point value; fitness adds the value of every satisfied
//! constraint and nothing for violated ones. There are no penalties.
//!
//! ## Key Components
//!
//! - `Constraint` trait: the verdict and point value of one rule
//! - `ConstraintSet`: the run's constraints, shared read-only by every evaluation
//! - Range constraints (`range`): scheduled-hours coverage and required roles over a
//!   recurring weekly window
//! - Cap constraints (`cap`): per-person weekly and daily hour limits
//!
//! ## Basic Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rotagen::constraints::{ConstraintSet, RequiredRoleConstraint, ScheduledHoursConstraint};
//! use rotagen::roster::{Person, Roster};
//! use rotagen::time_grid::ScheduleWindow;
//!
//! let roster = Roster::new(vec![Person::new(0, "Ada", 40, 8).with_role("lead")]).unwrap();
//!
//! let constraints = ConstraintSet::builder()
//!     .with_constraint(ScheduledHoursConstraint::new("9:00-10:00", "Mon-Fri").unwrap())
//!     .with_constraint(RequiredRoleConstraint::new("9:00-9:00", "Mon-Fri", "lead").unwrap())
//!     .build()
//!     .with_person_caps(&roster);
//!
//! // Two range constraints plus a weekly and a daily cap for Ada.
//! assert_eq!(constraints.len(), 4);
//!
//! let window = ScheduleWindow::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
//! );
//! assert_eq!(constraints.hours_to_schedule(&window).len(), 2);
//! ```

pub mod cap;
pub mod range;

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

use crate::{
    evolution::Score,
    roster::Roster,
    solution::Solution,
    time_grid::{HourSlot, RecurringWindow, ScheduleWindow},
};

pub use cap::{MaxHoursPerDayConstraint, MaxHoursPerWeekConstraint, DEFAULT_CAP_VALUE};
pub use range::{RequiredRoleConstraint, ScheduledHoursConstraint, DEFAULT_RANGE_VALUE};

/// Trait for weighted soft rules evaluated against a solution.
pub trait Constraint: Debug + Send + Sync {
    /// Human-readable description, used in fitness breakdowns.
    fn describe(&self) -> String;

    /// Points added to fitness when the constraint is satisfied.
    fn value(&self) -> Score;

    /// Whether `solution` satisfies this constraint.
    fn is_satisfied(&self, solution: &Solution<'_>) -> bool;

    /// The recurring window whose hours this constraint requires to be scheduled.
    ///
    /// Only coverage constraints return a window; their union defines the hours a gene
    /// vector indexes.
    fn coverage(&self) -> Option<&RecurringWindow> {
        None
    }
}

/// Verdict of a single constraint on a single solution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintVerdict {
    pub description: String,
    pub value: Score,
    pub satisfied: bool,
}

impl ConstraintVerdict {
    /// Points this verdict contributes to fitness.
    pub fn contribution(&self) -> Score {
        if self.satisfied {
            self.value
        } else {
            0
        }
    }
}

/// The constraints of a run.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Arc<dyn Constraint>>,
}

impl ConstraintSet {
    /// Creates a new empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new constraint set builder.
    pub fn builder() -> ConstraintSetBuilder {
        ConstraintSetBuilder::new()
    }

    /// Adds a constraint to the set.
    pub fn add_constraint<C>(&mut self, constraint: C) -> &mut Self
    where
        C: Constraint + 'static,
    {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Adds a constraint that is already shared with other sets.
    pub fn add_shared(&mut self, constraint: Arc<dyn Constraint>) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends a weekly and a daily hour cap for every person on the roster.
    pub fn with_person_caps(mut self, roster: &Roster) -> Self {
        for person in roster.people() {
            self.add_constraint(MaxHoursPerWeekConstraint::new(person));
        }
        for person in roster.people() {
            self.add_constraint(MaxHoursPerDayConstraint::new(person));
        }
        self
    }

    /// Sum of the values of the constraints `solution` satisfies.
    pub fn satisfied_value(&self, solution: &Solution<'_>) -> Score {
        self.constraints
            .iter()
            .filter(|constraint| constraint.is_satisfied(solution))
            .map(|constraint| constraint.value())
            .sum()
    }

    /// Per-constraint verdicts, in set order.
    pub fn verdicts(&self, solution: &Solution<'_>) -> Vec<ConstraintVerdict> {
        self.constraints
            .iter()
            .map(|constraint| ConstraintVerdict {
                description: constraint.describe(),
                value: constraint.value(),
                satisfied: constraint.is_satisfied(solution),
            })
            .collect()
    }

    /// The ascending union of every coverage constraint's hours inside `window`.
    pub fn hours_to_schedule(&self, window: &ScheduleWindow) -> Vec<HourSlot> {
        let hours: BTreeSet<HourSlot> = self
            .constraints
            .iter()
            .filter_map(|constraint| constraint.coverage())
            .flat_map(|coverage| coverage.slots_within(window))
            .collect();
        hours.into_iter().collect()
    }

    /// Largest fitness the constraints alone can contribute.
    pub fn max_value(&self) -> Score {
        self.constraints.iter().map(|constraint| constraint.value()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Constraint>> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Builder for creating constraint sets.
#[derive(Debug, Default)]
pub struct ConstraintSetBuilder {
    constraints: Vec<Arc<dyn Constraint>>,
}

impl ConstraintSetBuilder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint to the builder.
    pub fn with_constraint<C>(mut self, constraint: C) -> Self
    where
        C: Constraint + 'static,
    {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Builds the constraint set.
    pub fn build(self) -> ConstraintSet {
        ConstraintSet {
            constraints: self.constraints,
        }
    }
}
