use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    advance::{self, AdvanceLedger, LegacyAdvance},
    attendance::{AttendanceLedger, AttendanceStatus},
    consts::UNSPECIFIED_LOCATION,
    error::{ImportError, ValidationError},
    ids::{AdvanceId, EmployeeId, LocationId},
};

/// An employee as it is held in memory, always in the list advance shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EmployeeRecord")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    pub salary: f64,
    pub attendance: AttendanceLedger,
    pub advances: AdvanceLedger,
}

/// An employee exactly as stored, in either the current or the legacy shape
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    #[serde(default, alias = "location")]
    pub location_id: Option<LocationId>,
    pub salary: f64,
    #[serde(default)]
    pub attendance: AttendanceLedger,
    #[serde(default)]
    pub advances: Option<AdvanceLedger>,
    #[serde(flatten)]
    pub legacy: LegacyAdvance,
}

impl EmployeeRecord {
    /// Idempotent, see [`advance::migrate_legacy`]
    pub fn migrate_legacy(&mut self) {
        advance::migrate_legacy(&mut self.advances, &mut self.legacy);
    }
}

impl From<EmployeeRecord> for Employee {
    fn from(mut record: EmployeeRecord) -> Self {
        record.migrate_legacy();

        Employee {
            id: record.id,
            name: record.name,
            position: record.position,
            location_id: record.location_id,
            salary: record.salary,
            attendance: record.attendance,
            advances: record.advances.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormAdvance {
    pub amount: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Fields submitted by the create and edit forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub name: String,
    pub position: String,
    pub salary: f64,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    /// Opens the advance list on create; on edit it rewrites the latest
    /// entry. Ignored unless the amount is positive.
    #[serde(default, alias = "openingAdvance")]
    pub advance: Option<FormAdvance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceForm {
    pub amount: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Query criteria, each one a pass-through when empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub absent_today: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    employees: Vec<Employee>,
    locations: Vec<Location>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>, locations: Vec<Location>) -> Self {
        Self { employees, locations }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| &employee.id == id)
    }

    fn employee_mut(&mut self, id: &EmployeeId) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|employee| &employee.id == id)
    }

    /// Display name of a location reference, never failing
    pub fn location_name(&self, id: Option<&LocationId>) -> &str {
        id.and_then(|id| self.locations.iter().find(|location| &location.id == id))
            .map(|location| location.name.as_str())
            .unwrap_or(UNSPECIFIED_LOCATION)
    }

    fn validate(&self, form: &EmployeeForm) -> Result<(), ValidationError> {
        if form.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if form.position.trim().is_empty() {
            return Err(ValidationError::EmptyPosition);
        }
        if !(form.salary.is_finite() && form.salary > 0.0) {
            return Err(ValidationError::NonPositiveSalary);
        }

        let Some(location_id) = &form.location_id else {
            return Err(ValidationError::MissingLocation);
        };
        if !self.locations.iter().any(|location| &location.id == location_id) {
            return Err(ValidationError::UnknownLocation(location_id.to_string()));
        }

        Ok(())
    }

    pub fn add_employee(&mut self, form: EmployeeForm) -> Result<EmployeeId, ValidationError> {
        self.validate(&form)?;

        let mut advances = AdvanceLedger::default();
        if let Some(opening) = form.advance.filter(|opening| opening.amount > 0.0) {
            let date = opening.date.unwrap_or_else(|| Local::now().date_naive());
            advances.add(opening.amount, Some(date), None)?;
        }

        let id = EmployeeId::generate();
        self.employees.push(Employee {
            id: id.clone(),
            name: form.name.trim().to_owned(),
            position: form.position.trim().to_owned(),
            location_id: form.location_id,
            salary: form.salary,
            attendance: AttendanceLedger::default(),
            advances,
        });

        info!(%id, "employee added");
        Ok(id)
    }

    /// `Ok(false)` when `id` no longer exists
    pub fn update_employee(&mut self, id: &EmployeeId, form: EmployeeForm) -> Result<bool, ValidationError> {
        self.validate(&form)?;

        let advance = form.advance
            .filter(|advance| advance.amount > 0.0)
            .map(|advance| {
                let date = advance.date.unwrap_or_else(|| Local::now().date_naive());
                advance::validate(advance.amount, Some(date)).map(|date| (advance.amount, date))
            })
            .transpose()?;

        let Some(employee) = self.employee_mut(id) else {
            debug!(%id, "update of missing employee ignored");
            return Ok(false);
        };

        employee.name = form.name.trim().to_owned();
        employee.position = form.position.trim().to_owned();
        employee.salary = form.salary;
        employee.location_id = form.location_id;

        if let Some((amount, date)) = advance {
            let advance_id = employee.advances.replace_latest(amount, Some(date))?;
            debug!(%id, %advance_id, amount, "latest advance rewritten");
        }

        info!(%id, "employee updated");
        Ok(true)
    }

    /// Drops the employee along with all of its attendance and advances
    pub fn remove_employee(&mut self, id: &EmployeeId) -> bool {
        let before = self.employees.len();
        self.employees.retain(|employee| &employee.id != id);

        let removed = self.employees.len() != before;
        if removed {
            info!(%id, "employee removed");
        }
        removed
    }

    pub fn clear_employees(&mut self) {
        info!(count = self.employees.len(), "all employees cleared");
        self.employees.clear();
    }

    /// `Ok(None)` when `id` no longer exists
    pub fn cycle_attendance(
        &mut self,
        id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<AttendanceStatus>, ValidationError> {
        let Some(employee) = self.employee_mut(id) else {
            return Ok(None);
        };

        let status = employee.attendance.cycle(date)?;
        info!(%id, %date, ?status, "attendance changed");

        Ok(Some(status))
    }

    /// Validation comes first, so a bad form on a missing employee still errors
    pub fn add_advance(&mut self, id: &EmployeeId, form: AdvanceForm) -> Result<Option<AdvanceId>, ValidationError> {
        advance::validate(form.amount, form.date)?;

        let Some(employee) = self.employee_mut(id) else {
            return Ok(None);
        };

        let advance_id = employee.advances.add(form.amount, form.date, form.note)?;
        info!(%id, %advance_id, amount = form.amount, "advance added");

        Ok(Some(advance_id))
    }

    pub fn remove_advance(&mut self, id: &EmployeeId, advance_id: &AdvanceId) -> bool {
        let removed = self.employee_mut(id)
            .is_some_and(|employee| employee.advances.remove(advance_id));

        if removed {
            info!(%id, %advance_id, "advance removed");
        }
        removed
    }

    pub fn add_location(&mut self, name: &str) -> Result<LocationId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyLocationName);
        }

        let id = LocationId::generate();
        self.locations.push(Location {
            id: id.clone(),
            name: name.to_owned(),
            created_at: Utc::now(),
        });

        info!(%id, name, "location added");
        Ok(id)
    }

    /// Swaps the whole employee list, nothing is merged
    pub fn replace_employees(&mut self, employees: Vec<Employee>) {
        info!(count = employees.len(), "employees replaced");
        self.employees = employees;
    }

    /// Name/position substring, then location, then absent today.
    /// Roster order is preserved.
    pub fn filter(&self, criteria: &RosterFilter, today: NaiveDate) -> Vec<&Employee> {
        let needle = criteria.name
            .as_deref()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty());
        let location = criteria.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty());

        self.employees
            .iter()
            .filter(|employee| match &needle {
                Some(needle) => employee.name.to_lowercase().contains(needle)
                    || employee.position.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|employee| match location {
                Some(location) => employee.location_id.as_ref().is_some_and(|id| id.as_str() == location),
                None => true,
            })
            .filter(|employee| {
                !criteria.absent_today || employee.attendance.status_of(today) == AttendanceStatus::Absent
            })
            .collect()
    }
}

/// Reads an import document. Either every record decodes or nothing is returned.
pub fn parse_import(document: &str) -> Result<Vec<Employee>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(document).map_err(ImportError::Syntax)?;

    if !value.is_array() {
        return Err(ImportError::NotASequence);
    }

    serde_json::from_value(value).map_err(ImportError::Malformed)
}

pub fn export(employees: &[Employee]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(employees)
}
