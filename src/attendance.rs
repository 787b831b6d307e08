use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{calendar::MonthRef, consts::REST_DAY, error::ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    #[default]
    #[serde(rename = "not-set")]
    Unset,
    Present,
    Absent,
}

impl AttendanceStatus {
    /// unset → present → absent → unset
    pub fn next(self) -> Self {
        match self {
            AttendanceStatus::Unset => AttendanceStatus::Present,
            AttendanceStatus::Present => AttendanceStatus::Absent,
            AttendanceStatus::Absent => AttendanceStatus::Unset,
        }
    }
}

/// The only key form attendance is stored under, `YYYY-MM-DD`
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendance {
    pub present_days: u32,
    pub absent_days: u32,
    /// Working days with no mark
    pub unset_days: u32,
}

/// Sparse per-day marks of one employee. A missing key reads as unset.
///
/// Keys that are not canonical dates survive a load/save round trip but never
/// match a calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceLedger(BTreeMap<String, AttendanceStatus>);

impl AttendanceLedger {
    pub fn status_of(&self, date: NaiveDate) -> AttendanceStatus {
        self.0.get(&date_key(date)).copied().unwrap_or_default()
    }

    /// Advances the mark of `date` one step and returns the new status
    pub fn cycle(&mut self, date: NaiveDate) -> Result<AttendanceStatus, ValidationError> {
        if date.weekday() == REST_DAY {
            return Err(ValidationError::RestDay(date));
        }

        let key = date_key(date);
        let status = self.0.get(&key).copied().unwrap_or_default().next();

        match status {
            AttendanceStatus::Unset => {
                self.0.remove(&key);
            },
            marked => {
                self.0.insert(key, marked);
            },
        }

        Ok(status)
    }

    pub fn monthly(&self, month: MonthRef) -> MonthlyAttendance {
        month.working_days().fold(MonthlyAttendance::default(), |mut acc, day| {
            match self.status_of(day) {
                AttendanceStatus::Present => acc.present_days += 1,
                AttendanceStatus::Absent => acc.absent_days += 1,
                AttendanceStatus::Unset => acc.unset_days += 1,
            }
            acc
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|status| *status == AttendanceStatus::Unset)
    }
}
