//! Month → work week partitioning.
//!
//! A work week runs Saturday through Thursday. Friday is the rest day and is
//! never stored in a week; it is implied between a Thursday and the following
//! Saturday. The weeks of a month are every Saturday-anchored week that holds
//! at least one day of that month, so the first and last week may borrow days
//! from the neighbouring months.

use std::fmt;

use chrono::{Datelike as _, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{consts::{PUBLIC_HOLIDAYS, REST_DAY, WORK_WEEK}, error::CalendarError, utils};

/// A (year, month) reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMonth", into = "RawMonth")]
pub struct MonthRef {
    first: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RawMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawMonth> for MonthRef {
    type Error = CalendarError;

    fn try_from(value: RawMonth) -> Result<Self, Self::Error> {
        MonthRef::new(value.year, value.month)
    }
}

impl From<MonthRef> for RawMonth {
    fn from(value: MonthRef) -> Self {
        RawMonth { year: value.year(), month: value.month() }
    }
}

impl MonthRef {
    /// `month` is 1-based
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(CalendarError::InvalidMonth { year, month })
    }

    /// The month `date` falls in
    pub fn of(date: NaiveDate) -> Self {
        Self { first: date.with_day(1).unwrap_or(date) }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days().last().unwrap_or(self.first)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every calendar day of the month, in order
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month();

        self.first.iter_days().take_while(move |day| day.month() == month)
    }

    /// Every day of the month except the rest day
    pub fn working_days(self) -> impl Iterator<Item = NaiveDate> {
        self.days().filter(|day| day.weekday() != REST_DAY)
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}

/// Up to six consecutive working days, Saturday first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Week {
    days: Vec<NaiveDate>,
}

impl Week {
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Pagination title, e.g. `30/8 - 4/9`
    pub fn label(&self) -> String {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => format!(
                "{}/{} - {}/{}",
                first.day(), first.month(), last.day(), last.month()
            ),
            _ => String::new(),
        }
    }
}

/// How a single date is shown on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayType {
    Workday,
    RestDay,
    Holiday,
}

/// Name of the public holiday falling on `date`
pub fn holiday(date: NaiveDate) -> Option<&'static str> {
    PUBLIC_HOLIDAYS
        .iter()
        .find(|((year, month, day), _)| (date.year(), date.month(), date.day()) == (*year, *month, *day))
        .map(|(_, name)| *name)
}

/// A holiday wins over the rest day
pub fn day_type(date: NaiveDate) -> DayType {
    if holiday(date).is_some() {
        DayType::Holiday
    } else if date.weekday() == REST_DAY {
        DayType::RestDay
    } else {
        DayType::Workday
    }
}

/// Saturday on or before `date`
fn week_anchor(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(utils::days_until(WORK_WEEK.0, date.weekday())))
}

/// Ordered work weeks overlapping `month`, boundary days included.
///
/// A week made entirely of neighbouring-month days is never returned.
pub fn weeks_for_month(month: MonthRef) -> Vec<Week> {
    let first = month.first_day();
    let last = month.last_day();

    let Some(start) = week_anchor(first) else {
        return Vec::new();
    };
    let Some(end) = last.checked_add_days(Days::new(utils::days_until(last.weekday(), WORK_WEEK.1))) else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut current = Vec::new();

    for day in start.iter_days().take_while(|day| *day <= end) {
        if day.weekday() == REST_DAY {
            continue;
        }

        if day.weekday() == WORK_WEEK.0 && !current.is_empty() {
            weeks.push(Week { days: std::mem::take(&mut current) });
        }

        current.push(day);
    }

    if !current.is_empty() {
        weeks.push(Week { days: current });
    }

    weeks.retain(|week| week.days.iter().any(|day| month.contains(*day)));
    weeks
}

/// Index of the week holding `today`, only when `today` lies in `month`.
///
/// A Friday belongs to the week that ended the day before it.
pub fn today_week_index(month: MonthRef, today: NaiveDate) -> Option<usize> {
    if !month.contains(today) {
        return None;
    }

    let anchor = week_anchor(today)?;

    weeks_for_month(month)
        .iter()
        .position(|week| week.first() == Some(anchor))
}

/// Week selected when `month` is opened: today's week, else the first one
pub fn current_week_index(month: MonthRef, today: NaiveDate) -> usize {
    today_week_index(month, today).unwrap_or(0)
}
