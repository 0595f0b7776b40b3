//! # Roster
//!
//! The people a rota can assign. Ids are small integers handed out at load time, in load
//! order; they are what a gene vector stores.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveTime;

use crate::error::{OptionExt, Result, RotaError};

/// Identifier of a person on the roster.
pub type PersonId = usize;

/// One member of staff.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub max_hours_per_week: usize,
    pub max_hours_per_day: usize,
    /// Start of the person's availability window. Carried for reporting, not scored.
    pub start_time: NaiveTime,
    /// End of the person's availability window. Carried for reporting, not scored.
    pub end_time: NaiveTime,
    pub roles: BTreeSet<String>,
}

impl Person {
    /// Creates a person with the given hour caps, no roles and no availability window
    /// recorded (both ends at midnight).
    pub fn new(
        id: PersonId,
        name: impl Into<String>,
        max_hours_per_week: usize,
        max_hours_per_day: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            max_hours_per_week,
            max_hours_per_day,
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            roles: BTreeSet::new(),
        }
    }

    /// Sets the availability window.
    pub fn with_availability(mut self, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Adds a role label.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// The full, immutable set of people for a run.
#[derive(Debug, Clone)]
pub struct Roster {
    people: Vec<Person>,
    index: HashMap<PersonId, usize>,
}

impl Roster {
    /// Builds a roster, rejecting duplicate ids.
    pub fn new(people: Vec<Person>) -> Result<Self> {
        let mut index = HashMap::with_capacity(people.len());
        for (position, person) in people.iter().enumerate() {
            if index.insert(person.id, position).is_some() {
                return Err(RotaError::DuplicatePerson(person.id));
            }
        }
        Ok(Self { people, index })
    }

    /// Looks a person up by id.
    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.index.get(&id).map(|&position| &self.people[position])
    }

    /// Looks a person up by id, failing for ids that are not on the roster.
    pub fn require(&self, id: PersonId) -> Result<&Person> {
        self.get(id).ok_or_else_rota(|| RotaError::UnknownPerson(id))
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.index.contains_key(&id)
    }

    /// The ids of every person, in roster order.
    pub fn ids(&self) -> Vec<PersonId> {
        self.people.iter().map(|person| person.id).collect()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
