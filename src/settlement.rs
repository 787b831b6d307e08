use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    advance::AdvanceSummary,
    attendance::{AttendanceStatus, MonthlyAttendance},
    calendar::MonthRef,
    consts::SALARY_DIVISOR,
    ids::EmployeeId,
    roster::{Employee, Roster},
};

/// Monthly deductions and net pay of one employee
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub gross_salary: f64,
    pub daily_rate: f64,
    pub present_days: u32,
    pub absent_days: u32,
    pub absent_deduction: f64,
    pub advance_deduction: f64,
    pub advance_count: usize,
    pub total_deduction: f64,
    /// Never below zero
    pub net_salary: f64,
    /// Share of gross salary that is paid out, 0 when gross is 0
    pub net_percentage: f64,
}

impl Settlement {
    pub fn compute(gross_salary: f64, attendance: MonthlyAttendance, advances: AdvanceSummary) -> Self {
        let daily_rate = gross_salary / SALARY_DIVISOR;
        let absent_deduction = attendance.absent_days as f64 * daily_rate;
        let advance_deduction = advances.total_amount;
        let total_deduction = absent_deduction + advance_deduction;
        let net_salary = (gross_salary - total_deduction).max(0.0);

        let net_percentage = if gross_salary > 0.0 {
            net_salary * 100.0 / gross_salary
        } else {
            0.0
        };

        Settlement {
            gross_salary,
            daily_rate,
            present_days: attendance.present_days,
            absent_days: attendance.absent_days,
            absent_deduction,
            advance_deduction,
            advance_count: advances.count,
            total_deduction,
            net_salary,
            net_percentage,
        }
    }
}

/// Read-only, may be called any number of times
pub fn settle(employee: &Employee, month: MonthRef) -> Settlement {
    Settlement::compute(
        employee.salary,
        employee.attendance.monthly(month),
        employee.advances.monthly_summary(month),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub employee_id: EmployeeId,
    pub name: String,
    pub position: String,
    pub location: String,
    pub salary: f64,
    pub present_days: u32,
    pub absent_days: u32,
    pub advances: f64,
    pub latest_advance: Option<NaiveDate>,
    pub total_deduction: f64,
    pub net_salary: f64,
    pub net_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub employees: usize,
    pub salary: f64,
    pub absent_days: u32,
    pub advances: f64,
    pub net_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: MonthRef,
    pub rows: Vec<ReportRow>,
    pub totals: ReportTotals,
}

impl MonthlyReport {
    /// One row per employee in `employees`, in the given order, plus a grand total
    pub fn build(roster: &Roster, employees: &[&Employee], month: MonthRef) -> Self {
        let rows = employees
            .iter()
            .map(|employee| {
                let advances = employee.advances.monthly_summary(month);
                let settlement = Settlement::compute(employee.salary, employee.attendance.monthly(month), advances);

                ReportRow {
                    employee_id: employee.id.clone(),
                    name: employee.name.clone(),
                    position: employee.position.clone(),
                    location: roster.location_name(employee.location_id.as_ref()).to_owned(),
                    salary: employee.salary,
                    present_days: settlement.present_days,
                    absent_days: settlement.absent_days,
                    advances: settlement.advance_deduction,
                    latest_advance: advances.latest_date,
                    total_deduction: settlement.total_deduction,
                    net_salary: settlement.net_salary,
                    net_percentage: settlement.net_percentage,
                }
            })
            .collect::<Vec<_>>();

        let totals = rows.iter().fold(ReportTotals::default(), |mut totals, row| {
            totals.employees += 1;
            totals.salary += row.salary;
            totals.absent_days += row.absent_days;
            totals.advances += row.advances;
            totals.net_salary += row.net_salary;
            totals
        });

        MonthlyReport { month, rows, totals }
    }
}

/// Headline counters of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOverview {
    pub total_employees: usize,
    pub present_today: usize,
    pub absent_today: usize,
    /// Advances dated in the browsed month
    pub total_advances: f64,
}

impl DailyOverview {
    pub fn build(employees: &[&Employee], today: NaiveDate, month: MonthRef) -> Self {
        employees.iter().fold(DailyOverview::default(), |mut overview, employee| {
            overview.total_employees += 1;

            match employee.attendance.status_of(today) {
                AttendanceStatus::Present => overview.present_today += 1,
                AttendanceStatus::Absent => overview.absent_today += 1,
                AttendanceStatus::Unset => {},
            }

            overview.total_advances += employee.advances.monthly_summary(month).total_amount;
            overview
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::roster::{AdvanceForm, EmployeeForm, RosterFilter};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn attendance(absent_days: u32) -> MonthlyAttendance {
        MonthlyAttendance { present_days: 0, absent_days, unset_days: 0 }
    }

    fn advances(total_amount: f64) -> AdvanceSummary {
        AdvanceSummary { total_amount, latest_date: None, count: 1 }
    }

    /// Ahmed earns 3000, misses 2 days of September and takes 250 in advances
    fn roster() -> (Roster, EmployeeId) {
        let mut roster = Roster::default();
        let cairo = roster.add_location("Cairo").unwrap();

        let id = roster.add_employee(EmployeeForm {
            name: "Ahmed".to_owned(),
            position: "Accountant".to_owned(),
            salary: 3000.0,
            location_id: Some(cairo),
            advance: None,
        }).unwrap();

        for day in [date(2025, 9, 1), date(2025, 9, 2)] {
            roster.cycle_attendance(&id, day).unwrap();
            roster.cycle_attendance(&id, day).unwrap();
        }
        roster.cycle_attendance(&id, date(2025, 9, 3)).unwrap();

        for (amount, day) in [(100.0, date(2025, 9, 4)), (150.0, date(2025, 9, 20)), (70.0, date(2025, 10, 1))] {
            roster.add_advance(&id, AdvanceForm { amount, date: Some(day), note: None }).unwrap();
        }

        (roster, id)
    }

    #[test]
    fn test_settle() {
        let (roster, id) = roster();
        let settlement = settle(roster.employee(&id).unwrap(), MonthRef::new(2025, 9).unwrap());

        assert_eq!(settlement.daily_rate, 100.0);
        assert_eq!(settlement.absent_days, 2);
        assert_eq!(settlement.present_days, 1);
        assert_eq!(settlement.absent_deduction, 200.0);
        assert_eq!(settlement.advance_deduction, 250.0);
        assert_eq!(settlement.total_deduction, 450.0);
        assert_eq!(settlement.net_salary, 2550.0);
        assert_eq!(settlement.net_percentage, 85.0);
    }

    #[test]
    fn test_settle_is_read_only() {
        let (roster, id) = roster();
        let before = roster.clone();

        let month = MonthRef::new(2025, 9).unwrap();
        let employee = roster.employee(&id).unwrap();
        assert_eq!(settle(employee, month), settle(employee, month));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_net_salary_is_clamped() {
        let settlement = Settlement::compute(3000.0, attendance(20), advances(5000.0));

        assert_eq!(settlement.total_deduction, 7000.0);
        assert_eq!(settlement.net_salary, 0.0);
        assert_eq!(settlement.net_percentage, 0.0);

        for salary in [0.0, 1.0, 450.0, 3000.0] {
            for absent_days in [0, 1, 15, 31] {
                for advance in [0.0, 10.0, 10_000.0] {
                    let settlement = Settlement::compute(salary, attendance(absent_days), advances(advance));
                    assert!(settlement.net_salary >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_zero_salary_percentage() {
        let settlement = Settlement::compute(0.0, attendance(0), AdvanceSummary::default());

        assert_eq!(settlement.daily_rate, 0.0);
        assert_eq!(settlement.net_percentage, 0.0);
    }

    #[test]
    fn test_monthly_report() {
        let (mut roster, _) = roster();
        let cairo = roster.locations()[0].id.clone();
        roster.add_employee(EmployeeForm {
            name: "Mona".to_owned(),
            position: "Designer".to_owned(),
            salary: 4500.0,
            location_id: Some(cairo),
            advance: None,
        }).unwrap();

        let employees = roster.filter(&RosterFilter::default(), date(2025, 9, 17));
        let report = MonthlyReport::build(&roster, &employees, MonthRef::new(2025, 9).unwrap());

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "Ahmed");
        assert_eq!(report.rows[0].location, "Cairo");
        assert_eq!(report.rows[0].latest_advance, Some(date(2025, 9, 20)));
        assert_eq!(report.rows[1].net_salary, 4500.0);

        assert_eq!(report.totals.employees, 2);
        assert_eq!(report.totals.salary, 7500.0);
        assert_eq!(report.totals.absent_days, 2);
        assert_eq!(report.totals.advances, 250.0);
        assert_eq!(report.totals.net_salary, 7050.0);
    }

    #[test]
    fn test_daily_overview() {
        let (roster, _) = roster();
        let employees = roster.filter(&RosterFilter::default(), date(2025, 9, 2));

        let overview = DailyOverview::build(&employees, date(2025, 9, 2), MonthRef::new(2025, 10).unwrap());
        assert_eq!(overview.total_employees, 1);
        assert_eq!(overview.absent_today, 1);
        assert_eq!(overview.present_today, 0);
        assert_eq!(overview.total_advances, 70.0);
    }
}
