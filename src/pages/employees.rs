use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    attendance::AttendanceStatus,
    auth::Operator,
    calendar::MonthRef,
    error::LedgerError,
    ids::{AdvanceId, EmployeeId},
    roster::{AdvanceForm, Employee, EmployeeForm, RosterFilter},
    session::Session,
    settlement,
};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list_employees)
        .service(create_employee)
        .service(update_employee)
        .service(delete_employee)
        .service(clear_employees)
        .service(cycle_attendance)
        .service(get_monthly_attendance)
        .service(create_advance)
        .service(delete_advance)
        .service(get_advance_summary)
        .service(get_settlement);
}

#[get("")]
async fn list_employees(session: web::Data<Session>, _operator: Operator, filter: web::Query<RosterFilter>) -> impl Responder {
    let today = session.today();

    let employees = session.read(|roster| {
        roster.filter(&filter, today)
            .into_iter()
            .map(|employee| EmployeeView {
                employee: employee.clone(),
                location_name: roster.location_name(employee.location_id.as_ref()).to_owned(),
                today: employee.attendance.status_of(today),
            })
            .collect::<Vec<_>>()
    }).await;

    web::Json(employees)
}

#[post("")]
async fn create_employee(session: web::Data<Session>, _operator: Operator, payload: web::Json<EmployeeForm>) -> Result<impl Responder, LedgerError> {
    let id = session.add_employee(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(web::Json(id)))
}

#[put("/{id}")]
async fn update_employee(
    session: web::Data<Session>,
    _operator: Operator,
    path: web::Path<EmployeePath>,
    payload: web::Json<EmployeeForm>,
) -> Result<impl Responder, LedgerError> {
    let id = EmployeeId::from(path.into_inner().id);
    let updated = session.update_employee(&id, payload.into_inner()).await?;

    Ok(web::Json(updated))
}

#[delete("/{id}")]
async fn delete_employee(session: web::Data<Session>, _operator: Operator, path: web::Path<EmployeePath>) -> impl Responder {
    let id = EmployeeId::from(path.into_inner().id);

    web::Json(session.remove_employee(&id).await)
}

#[delete("")]
async fn clear_employees(session: web::Data<Session>, _operator: Operator) -> impl Responder {
    session.clear_employees().await;

    HttpResponse::NoContent().finish()
}

#[post("/{id}/attendance/{date}")]
async fn cycle_attendance(session: web::Data<Session>, _operator: Operator, path: web::Path<AttendancePath>) -> Result<impl Responder, LedgerError> {
    let AttendancePath { id, date } = path.into_inner();
    let status = session.cycle_attendance(&EmployeeId::from(id), date).await?;

    Ok(web::Json(status))
}

#[get("/{id}/attendance/{year}/{month}")]
async fn get_monthly_attendance(
    session: web::Data<Session>,
    _operator: Operator,
    path: web::Path<EmployeePath>,
    month: MonthRef,
) -> impl Responder {
    let id = EmployeeId::from(path.into_inner().id);

    let monthly = session.read(|roster| {
        roster.employee(&id).map(|employee| employee.attendance.monthly(month))
    }).await;

    web::Json(monthly)
}

#[post("/{id}/advances")]
async fn create_advance(
    session: web::Data<Session>,
    _operator: Operator,
    path: web::Path<EmployeePath>,
    payload: web::Json<AdvanceForm>,
) -> Result<impl Responder, LedgerError> {
    let id = EmployeeId::from(path.into_inner().id);
    let advance_id = session.add_advance(&id, payload.into_inner()).await?;

    Ok(web::Json(advance_id))
}

#[delete("/{id}/advances/{advance_id}")]
async fn delete_advance(session: web::Data<Session>, _operator: Operator, path: web::Path<AdvancePath>) -> impl Responder {
    let AdvancePath { id, advance_id } = path.into_inner();

    web::Json(session.remove_advance(&EmployeeId::from(id), &AdvanceId::from(advance_id)).await)
}

#[get("/{id}/advances/{year}/{month}")]
async fn get_advance_summary(
    session: web::Data<Session>,
    _operator: Operator,
    path: web::Path<EmployeePath>,
    month: MonthRef,
) -> impl Responder {
    let id = EmployeeId::from(path.into_inner().id);

    let summary = session.read(|roster| {
        roster.employee(&id).map(|employee| employee.advances.monthly_summary(month))
    }).await;

    web::Json(summary)
}

#[get("/{id}/settlement/{year}/{month}")]
async fn get_settlement(
    session: web::Data<Session>,
    _operator: Operator,
    path: web::Path<EmployeePath>,
    month: MonthRef,
) -> impl Responder {
    let id = EmployeeId::from(path.into_inner().id);

    let settlement = session.read(|roster| {
        roster.employee(&id).map(|employee| settlement::settle(employee, month))
    }).await;

    web::Json(settlement)
}
