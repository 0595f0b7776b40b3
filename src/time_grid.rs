//! # Time Grid
//!
//! Hour-granularity time handling: the `HourSlot` a gene indexes, the recurring weekly
//! hour/day ranges constraints are written in, and the enumeration of every slot a
//! recurring range covers inside a `[from, to)` date window.
//!
//! Ranges use the loader's text forms: hours as `"<start>:00-<end>:00"` and days as
//! `"<Start>-<End>"` over `Mon`..`Sun`. Both ends are inclusive.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rotagen::time_grid::hours_in_range;
//!
//! // 2024-01-01 is a Monday.
//! let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let to = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
//!
//! let hours = hours_in_range("9:00-16:00", "Mon-Fri", from, to).unwrap();
//! assert_eq!(hours.len(), 8 * 5);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Result, RotaError};

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One schedulable hour, identified by date and hour-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "NaiveDateTime", into = "NaiveDateTime")
)]
pub struct HourSlot(NaiveDateTime);

impl HourSlot {
    /// Creates the slot starting at `hour`:00 on `date`.
    pub fn new(date: NaiveDate, hour: u32) -> Result<Self> {
        date.and_hms_opt(hour, 0, 0)
            .map(HourSlot)
            .ok_or_else(|| RotaError::InvalidHourSlot(format!("{} hour {}", date, hour)))
    }

    /// The first slot of `date`.
    pub fn midnight(date: NaiveDate) -> Self {
        HourSlot(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Day of the week, Monday = 0.
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_monday()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// The following slot, or `None` at the end of chrono's date range.
    pub fn succ(&self) -> Option<Self> {
        self.0.checked_add_signed(Duration::hours(1)).map(HourSlot)
    }
}

impl TryFrom<NaiveDateTime> for HourSlot {
    type Error = RotaError;

    /// Accepts only whole hours.
    fn try_from(datetime: NaiveDateTime) -> Result<Self> {
        if datetime.minute() != 0 || datetime.second() != 0 || datetime.nanosecond() != 0 {
            return Err(RotaError::InvalidHourSlot(format!(
                "{} does not start on the hour",
                datetime
            )));
        }
        Ok(HourSlot(datetime))
    }
}

impl From<HourSlot> for NaiveDateTime {
    fn from(slot: HourSlot) -> Self {
        slot.0
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:00"))
    }
}

/// The half-open date window `[from, to)` a run schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ScheduleWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Every hour from `from` 00:00 up to, but excluding, `to` 00:00.
    pub fn hours(&self) -> impl Iterator<Item = HourSlot> {
        let end = HourSlot::midnight(self.to);
        std::iter::successors(Some(HourSlot::midnight(self.from)), |slot| slot.succ())
            .take_while(move |slot| *slot < end)
    }

    pub fn contains(&self, slot: &HourSlot) -> bool {
        let date = slot.date();
        self.from <= date && date < self.to
    }
}

/// Inclusive range of hours of the day, e.g. `9:00-17:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    start: u32,
    end: u32,
}

impl HourRange {
    /// Parses `"<start>:00-<end>:00"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (start, end) = raw
            .split_once('-')
            .ok_or_else(|| RotaError::range(raw, "expected '<start>:00-<end>:00'"))?;
        let start = parse_hour(raw, start)?;
        let end = parse_hour(raw, end)?;
        if start > end {
            return Err(RotaError::range(raw, "start hour is after end hour"));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00-{}:00", self.start, self.end)
    }
}

fn parse_hour(raw: &str, part: &str) -> Result<u32> {
    let digits = part
        .trim()
        .strip_suffix(":00")
        .ok_or_else(|| RotaError::range(raw, format!("'{}' is not a whole hour", part)))?;
    let hour: u32 = digits
        .parse()
        .map_err(|_| RotaError::range(raw, format!("'{}' is not a number", digits)))?;
    if hour > 23 {
        return Err(RotaError::range(raw, format!("hour {} is out of range", hour)));
    }
    Ok(hour)
}

/// Inclusive range of weekdays, e.g. `Mon-Fri`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    start: u32,
    end: u32,
}

impl DayRange {
    /// Parses `"<Start>-<End>"` with three-letter English day names.
    pub fn parse(raw: &str) -> Result<Self> {
        let (start, end) = raw
            .split_once('-')
            .ok_or_else(|| RotaError::range(raw, "expected '<Start>-<End>'"))?;
        let start = parse_day(raw, start)?;
        let end = parse_day(raw, end)?;
        if start > end {
            return Err(RotaError::range(raw, "start day is after end day"));
        }
        Ok(Self { start, end })
    }

    /// Whether the weekday (Monday = 0) falls inside the range.
    pub fn contains(&self, weekday_index: u32) -> bool {
        (self.start..=self.end).contains(&weekday_index)
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            DAY_NAMES[self.start as usize], DAY_NAMES[self.end as usize]
        )
    }
}

fn parse_day(raw: &str, part: &str) -> Result<u32> {
    let part = part.trim();
    DAY_NAMES
        .iter()
        .position(|name| *name == part)
        .map(|index| index as u32)
        .ok_or_else(|| RotaError::range(raw, format!("unknown day '{}'", part)))
}

/// A weekly recurring block of hours, the unit coverage and role constraints are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringWindow {
    pub hours: HourRange,
    pub days: DayRange,
}

impl RecurringWindow {
    pub fn new(hours: HourRange, days: DayRange) -> Self {
        Self { hours, days }
    }

    /// Parses both range strings.
    pub fn parse(hour_range: &str, day_range: &str) -> Result<Self> {
        Ok(Self::new(
            HourRange::parse(hour_range)?,
            DayRange::parse(day_range)?,
        ))
    }

    pub fn contains(&self, slot: &HourSlot) -> bool {
        self.days.contains(slot.weekday_index()) && self.hours.contains(slot.hour())
    }

    /// The covered slots inside `window`, ascending.
    pub fn slots_within<'a>(
        &'a self,
        window: &ScheduleWindow,
    ) -> impl Iterator<Item = HourSlot> + 'a {
        window.hours().filter(move |slot| self.contains(slot))
    }

    /// The covered slots between `start` 00:00 and `end` 00:00, collected.
    pub fn hours_in_range(&self, start: NaiveDate, end: NaiveDate) -> BTreeSet<HourSlot> {
        self.slots_within(&ScheduleWindow::new(start, end)).collect()
    }
}

impl fmt::Display for RecurringWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.days, self.hours)
    }
}

/// Every slot in `[start, end)` whose weekday is in `day_range` and whose hour is in
/// `hour_range`.
pub fn hours_in_range(
    hour_range: &str,
    day_range: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BTreeSet<HourSlot>> {
    Ok(RecurringWindow::parse(hour_range, day_range)?.hours_in_range(start, end))
}

/// The hours of one calendar day, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub hours: Vec<HourSlot>,
}

/// Groups an ascending slot sequence into runs of equal dates in a single pass.
///
/// The input is not re-sorted. An unsorted input yields one group per run of equal dates.
pub fn group_by_day<I>(slots: I) -> Vec<DayGroup>
where
    I: IntoIterator<Item = HourSlot>,
{
    let mut groups: Vec<DayGroup> = Vec::new();
    for slot in slots {
        match groups.last_mut() {
            Some(group) if group.date == slot.date() => group.hours.push(slot),
            _ => groups.push(DayGroup {
                date: slot.date(),
                hours: vec![slot],
            }),
        }
    }
    groups
}
