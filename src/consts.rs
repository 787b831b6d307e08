use chrono::Weekday;

/// Weekly rest day. Never part of a week, never markable, never deducted.
pub const REST_DAY: Weekday = Weekday::Fri;

/// (first day, last day) of a work week
pub const WORK_WEEK: (Weekday, Weekday) = (Weekday::Sat, Weekday::Thu);

/// Daily rate divisor, applied regardless of the month's real length
pub const SALARY_DIVISOR: f64 = 30.0;

/// Shown wherever an employee has no (or a dangling) location reference
pub const UNSPECIFIED_LOCATION: &str = "Unspecified";

pub const EMPLOYEES_DOCUMENT: &str = "attendanceEmployees";
pub const LOCATIONS_DOCUMENT: &str = "attendanceLocations";

pub const SESSION_LIFETIME_HOURS: i64 = 24;

pub const DEFAULT_AUTOSAVE_SECS: u64 = 30;

/// Public holidays as ((year, month, day), name). Display only, they are
/// still markable working days.
pub const PUBLIC_HOLIDAYS: &[((i32, u32, u32), &str)] = &[
    ((2025, 1, 1), "New Year's Day"),
    ((2025, 1, 25), "January 25 Revolution"),
    ((2025, 3, 22), "Mother's Day"),
    ((2025, 4, 25), "Sinai Liberation Day"),
    ((2025, 5, 1), "Labour Day"),
    ((2025, 7, 23), "July 23 Revolution"),
    ((2025, 10, 6), "Armed Forces Day"),
];

/// Largest document accepted by `POST /transfer/import`
pub const IMPORT_LIMIT_BYTES: usize = 16 * 1024 * 1024;
