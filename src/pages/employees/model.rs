use super::*;

/// An employee as listed, with its location resolved for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EmployeeView {
    #[serde(flatten)]
    pub(super) employee: Employee,
    pub(super) location_name: String,
    pub(super) today: AttendanceStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct EmployeePath {
    pub(super) id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct AttendancePath {
    pub(super) id: String,
    pub(super) date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct AdvancePath {
    pub(super) id: String,
    pub(super) advance_id: String,
}
