//! # Range Constraints
//!
//! Constraints written against a recurring weekly window. The covered hours are enumerated
//! afresh from the solution's `[from, to)` window on every check.

use crate::{
    error::Result,
    evolution::Score,
    solution::Solution,
    time_grid::RecurringWindow,
};

use super::Constraint;

/// Default value of coverage and role constraints.
pub const DEFAULT_RANGE_VALUE: Score = 100;

/// Every hour of the window must be assigned to someone.
#[derive(Debug, Clone)]
pub struct ScheduledHoursConstraint {
    window: RecurringWindow,
    value: Score,
}

impl ScheduledHoursConstraint {
    /// Parses the hour and day ranges, failing on malformed strings.
    pub fn new(hour_range: &str, day_range: &str) -> Result<Self> {
        Ok(Self::from_window(RecurringWindow::parse(hour_range, day_range)?))
    }

    pub fn from_window(window: RecurringWindow) -> Self {
        Self {
            window,
            value: DEFAULT_RANGE_VALUE,
        }
    }

    pub fn with_value(mut self, value: Score) -> Self {
        self.value = value;
        self
    }

    pub fn window(&self) -> &RecurringWindow {
        &self.window
    }
}

impl Constraint for ScheduledHoursConstraint {
    fn describe(&self) -> String {
        format!("scheduled-hours {}", self.window)
    }

    fn value(&self) -> Score {
        self.value
    }

    fn is_satisfied(&self, solution: &Solution<'_>) -> bool {
        self.window
            .slots_within(solution.window())
            .all(|hour| solution.is_allocated(&hour))
    }

    fn coverage(&self) -> Option<&RecurringWindow> {
        Some(&self.window)
    }
}

/// Every hour of the window must be assigned to someone holding `role`.
#[derive(Debug, Clone)]
pub struct RequiredRoleConstraint {
    window: RecurringWindow,
    role: String,
    value: Score,
}

impl RequiredRoleConstraint {
    /// Parses the hour and day ranges, failing on malformed strings.
    pub fn new(hour_range: &str, day_range: &str, role: impl Into<String>) -> Result<Self> {
        Ok(Self::from_window(
            RecurringWindow::parse(hour_range, day_range)?,
            role,
        ))
    }

    pub fn from_window(window: RecurringWindow, role: impl Into<String>) -> Self {
        Self {
            window,
            role: role.into(),
            value: DEFAULT_RANGE_VALUE,
        }
    }

    pub fn with_value(mut self, value: Score) -> Self {
        self.value = value;
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

impl Constraint for RequiredRoleConstraint {
    fn describe(&self) -> String {
        format!("required-role {} {}", self.role, self.window)
    }

    fn value(&self) -> Score {
        self.value
    }

    fn is_satisfied(&self, solution: &Solution<'_>) -> bool {
        self.window.slots_within(solution.window()).all(|hour| {
            solution
                .people_scheduled_for_hour(&hour)
                .is_some_and(|person| person.has_role(&self.role))
        })
    }
}
