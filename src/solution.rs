//! # Solution
//!
//! The decoded, read-only form of one gene vector: gene `i` assigns its person to the
//! `i`-th hour of the fixed schedule. A fresh `Solution` is built for every fitness
//! evaluation and dropped afterwards, so it only borrows the run-wide roster and
//! constraints.

use std::collections::HashMap;

use crate::{
    constraints::ConstraintSet,
    contiguity::ContiguityBonus,
    error::{Result, RotaError},
    evolution::Score,
    roster::{Person, PersonId, Roster},
    time_grid::{group_by_day, DayGroup, HourSlot, ScheduleWindow},
};

/// One candidate assignment, queryable by hour and by day.
#[derive(Debug, Clone)]
pub struct Solution<'a> {
    allocations: Vec<(HourSlot, PersonId)>,
    by_hour: HashMap<HourSlot, PersonId>,
    day_groups: Vec<DayGroup>,
    roster: &'a Roster,
    constraints: &'a ConstraintSet,
    window: ScheduleWindow,
}

impl<'a> Solution<'a> {
    /// Zips `hours` with `genes` into an allocation.
    ///
    /// # Errors
    ///
    /// - `LengthMismatch` if the two sequences differ in length.
    /// - `NotAscending` if `hours` is not strictly ascending.
    /// - `UnknownPerson` if a gene is not a roster id.
    pub fn new(
        hours: &[HourSlot],
        genes: &[PersonId],
        roster: &'a Roster,
        constraints: &'a ConstraintSet,
        window: ScheduleWindow,
    ) -> Result<Self> {
        if hours.len() != genes.len() {
            return Err(RotaError::LengthMismatch {
                expected: hours.len(),
                actual: genes.len(),
            });
        }
        if let Some(position) = first_out_of_order(hours) {
            return Err(RotaError::NotAscending { position });
        }

        let mut allocations = Vec::with_capacity(hours.len());
        let mut by_hour = HashMap::with_capacity(hours.len());
        for (&hour, &person) in hours.iter().zip(genes) {
            if !roster.contains(person) {
                return Err(RotaError::UnknownPerson(person));
            }
            allocations.push((hour, person));
            by_hour.insert(hour, person);
        }
        let day_groups = group_by_day(allocations.iter().map(|(hour, _)| *hour));

        Ok(Self {
            allocations,
            by_hour,
            day_groups,
            roster,
            constraints,
            window,
        })
    }

    /// The person assigned to `hour`, or `None` if the hour is not scheduled.
    pub fn people_scheduled_for_hour(&self, hour: &HourSlot) -> Option<&'a Person> {
        self.by_hour
            .get(hour)
            .and_then(|&person| self.roster.get(person))
    }

    /// The id assigned to `hour`, or `None` if the hour is not scheduled.
    pub fn person_id_for_hour(&self, hour: &HourSlot) -> Option<PersonId> {
        self.by_hour.get(hour).copied()
    }

    pub fn is_allocated(&self, hour: &HourSlot) -> bool {
        self.by_hour.contains_key(hour)
    }

    /// Allocation entries in schedule order.
    pub fn allocations(&self) -> impl Iterator<Item = (HourSlot, PersonId)> + '_ {
        self.allocations.iter().copied()
    }

    /// Number of hours assigned to `person` across the whole allocation.
    pub fn hours_for_person(&self, person: PersonId) -> usize {
        self.allocations
            .iter()
            .filter(|(_, assigned)| *assigned == person)
            .count()
    }

    /// Hours grouped by calendar day, in schedule order.
    pub fn day_groups(&self) -> &[DayGroup] {
        &self.day_groups
    }

    /// Contiguity bonus of this allocation under `bonus`.
    pub fn contiguity_bonus(&self, bonus: &ContiguityBonus) -> Result<Score> {
        bonus.score(self)
    }

    pub fn roster(&self) -> &'a Roster {
        self.roster
    }

    pub fn constraints(&self) -> &'a ConstraintSet {
        self.constraints
    }

    pub fn window(&self) -> &ScheduleWindow {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

fn first_out_of_order(hours: &[HourSlot]) -> Option<usize> {
    hours
        .windows(2)
        .position(|pair| pair[0] >= pair[1])
        .map(|position| position + 1)
}
