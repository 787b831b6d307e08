use actix_web::{get, web, Responder};
use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    auth::Operator,
    calendar::{self, DayType, MonthRef, Week},
    error::LedgerError,
    session::Session,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_current_month)
        .service(get_month)
        .service(get_week);
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDay {
    date: NaiveDate,
    weekday: String,
    /// `false` for boundary days of the neighbouring months
    in_month: bool,
    today: bool,
    day_type: DayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    holiday: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekView {
    index: usize,
    label: String,
    days: Vec<CalendarDay>,
}

impl WeekView {
    fn new(index: usize, week: &Week, month: MonthRef, today: NaiveDate) -> Self {
        Self {
            index,
            label: week.label(),
            days: week.days()
                .iter()
                .map(|day| CalendarDay {
                    date: *day,
                    weekday: day.weekday().to_string(),
                    in_month: month.contains(*day),
                    today: *day == today,
                    day_type: calendar::day_type(*day),
                    holiday: calendar::holiday(*day).map(str::to_owned),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthView {
    month: MonthRef,
    weeks: Vec<WeekView>,
    current_week: usize,
    today_week: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WeekPath {
    index: usize,
}

impl MonthView {
    fn new(month: MonthRef, today: NaiveDate) -> Self {
        let weeks = calendar::weeks_for_month(month)
            .iter()
            .enumerate()
            .map(|(index, week)| WeekView::new(index, week, month, today))
            .collect();

        Self {
            month,
            weeks,
            current_week: calendar::current_week_index(month, today),
            today_week: calendar::today_week_index(month, today),
        }
    }
}

/// The month holding today, as opened on first load
#[get("")]
async fn get_current_month(session: web::Data<Session>, _operator: Operator) -> impl Responder {
    let today = session.today();

    web::Json(MonthView::new(MonthRef::of(today), today))
}

#[get("/{year}/{month}")]
async fn get_month(session: web::Data<Session>, _operator: Operator, month: MonthRef) -> impl Responder {
    web::Json(MonthView::new(month, session.today()))
}

#[get("/{year}/{month}/weeks/{index}")]
async fn get_week(
    session: web::Data<Session>,
    _operator: Operator,
    month: MonthRef,
    path: web::Path<WeekPath>,
) -> Result<impl Responder, LedgerError> {
    let weeks = calendar::weeks_for_month(month);

    let Some(week) = weeks.get(path.index) else {
        return Err(LedgerError::NotFound);
    };

    Ok(web::Json(WeekView::new(path.index, week, month, session.today())))
}
