//! # Cap Constraints
//!
//! Per-person hour limits. Both the weekly and the daily cap count the person's hours
//! across the whole allocation; the daily cap is not scoped to a calendar day.

use crate::{
    evolution::Score,
    roster::{Person, PersonId},
    solution::Solution,
};

use super::Constraint;

/// Default value of per-person cap constraints.
pub const DEFAULT_CAP_VALUE: Score = 10;

fn within_cap(solution: &Solution<'_>, person: PersonId, cap: usize) -> bool {
    solution.hours_for_person(person) <= cap
}

/// The person must not be assigned more than `max_hours_per_week` hours.
#[derive(Debug, Clone)]
pub struct MaxHoursPerWeekConstraint {
    person: PersonId,
    name: String,
    cap: usize,
    value: Score,
}

impl MaxHoursPerWeekConstraint {
    pub fn new(person: &Person) -> Self {
        Self {
            person: person.id,
            name: person.name.clone(),
            cap: person.max_hours_per_week,
            value: DEFAULT_CAP_VALUE,
        }
    }

    pub fn with_value(mut self, value: Score) -> Self {
        self.value = value;
        self
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Constraint for MaxHoursPerWeekConstraint {
    fn describe(&self) -> String {
        format!("max-hours-per-week {} <= {}", self.name, self.cap)
    }

    fn value(&self) -> Score {
        self.value
    }

    fn is_satisfied(&self, solution: &Solution<'_>) -> bool {
        within_cap(solution, self.person, self.cap)
    }
}

/// The person must not be assigned more than `max_hours_per_day` hours in total.
#[derive(Debug, Clone)]
pub struct MaxHoursPerDayConstraint {
    person: PersonId,
    name: String,
    cap: usize,
    value: Score,
}

impl MaxHoursPerDayConstraint {
    pub fn new(person: &Person) -> Self {
        Self {
            person: person.id,
            name: person.name.clone(),
            cap: person.max_hours_per_day,
            value: DEFAULT_CAP_VALUE,
        }
    }

    pub fn with_value(mut self, value: Score) -> Self {
        self.value = value;
        self
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Constraint for MaxHoursPerDayConstraint {
    fn describe(&self) -> String {
        format!("max-hours-per-day {} <= {}", self.name, self.cap)
    }

    fn value(&self) -> Score {
        self.value
    }

    fn is_satisfied(&self, solution: &Solution<'_>) -> bool {
        within_cap(solution, self.person, self.cap)
    }
}
