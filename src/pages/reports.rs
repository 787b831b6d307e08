use actix_web::{get, web, Responder};

use crate::{
    auth::Operator,
    calendar::MonthRef,
    roster::RosterFilter,
    session::Session,
    settlement::{DailyOverview, MonthlyReport},
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_report)
        .service(get_overview);
}

/// Settlement of every employee passing the filter
#[get("/{year}/{month}")]
async fn get_report(session: web::Data<Session>, _operator: Operator, month: MonthRef, filter: web::Query<RosterFilter>) -> impl Responder {
    let today = session.today();

    let report = session.read(|roster| {
        let employees = roster.filter(&filter, today);
        MonthlyReport::build(roster, &employees, month)
    }).await;

    web::Json(report)
}

#[get("/{year}/{month}/overview")]
async fn get_overview(session: web::Data<Session>, _operator: Operator, month: MonthRef, filter: web::Query<RosterFilter>) -> impl Responder {
    let today = session.today();

    let overview = session.read(|roster| {
        let employees = roster.filter(&filter, today);
        DailyOverview::build(&employees, today, month)
    }).await;

    web::Json(overview)
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use chrono::NaiveDate;

    use crate::{
        pages::testing,
        roster::{AdvanceForm, EmployeeForm, Roster},
    };

    use super::*;

    fn roster() -> Roster {
        let mut roster = Roster::default();
        let cairo = roster.add_location("Cairo").unwrap();
        let giza = roster.add_location("Giza").unwrap();

        for (name, salary, location) in [("Ahmed", 3000.0, &cairo), ("Mona", 4500.0, &giza)] {
            roster.add_employee(EmployeeForm {
                name: name.to_owned(),
                position: "Accountant".to_owned(),
                salary,
                location_id: Some(location.clone()),
                advance: None,
            }).unwrap();
        }

        let ahmed = roster.employees()[0].id.clone();
        roster.cycle_attendance(&ahmed, testing::today()).unwrap();
        roster.cycle_attendance(&ahmed, testing::today()).unwrap();
        roster.add_advance(&ahmed, AdvanceForm {
            amount: 250.0,
            date: NaiveDate::from_ymd_opt(2025, 9, 4),
            note: None,
        }).unwrap();

        roster
    }

    #[actix_web::test]
    async fn test_report() {
        let app = test::init_service(
            App::new()
                .app_data(testing::session(roster()))
                .app_data(testing::authority())
                .service(web::scope("/reports").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/reports/2025/9")
            .insert_header(testing::bearer())
            .to_request();

        let report: MonthlyReport = test::call_and_read_body_json(&app, req).await;
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].absent_days, 1);
        assert_eq!(report.rows[1].location, "Giza");
        assert_eq!(report.totals.salary, 7500.0);
        assert_eq!(report.totals.advances, 250.0);
        assert_eq!(report.totals.net_salary, 7500.0 - 100.0 - 250.0);

        let req = test::TestRequest::default()
            .uri("/reports/2025/9?absentToday=true")
            .insert_header(testing::bearer())
            .to_request();

        let report: MonthlyReport = test::call_and_read_body_json(&app, req).await;
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].name, "Ahmed");
    }

    #[actix_web::test]
    async fn test_overview() {
        let app = test::init_service(
            App::new()
                .app_data(testing::session(roster()))
                .app_data(testing::authority())
                .service(web::scope("/reports").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/reports/2025/9/overview")
            .insert_header(testing::bearer())
            .to_request();

        let overview: DailyOverview = test::call_and_read_body_json(&app, req).await;
        assert_eq!(overview.total_employees, 2);
        assert_eq!(overview.absent_today, 1);
        assert_eq!(overview.present_today, 0);
        assert_eq!(overview.total_advances, 250.0);

        let req = test::TestRequest::default()
            .uri("/reports/2025/10/overview")
            .insert_header(testing::bearer())
            .to_request();

        let overview: DailyOverview = test::call_and_read_body_json(&app, req).await;
        assert_eq!(overview.total_advances, 0.0);
    }
}
