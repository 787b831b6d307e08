use std::sync::{PoisonError, RwLock};

use chrono::{Local, NaiveDate};
use futures_util::lock::Mutex;
use tracing::{info, warn};

use crate::{
    attendance::AttendanceStatus,
    error::{ImportError, ValidationError},
    ids::{AdvanceId, EmployeeId, LocationId},
    roster::{self, AdvanceForm, EmployeeForm, Roster},
    store::{DocumentStore, StoreError},
};

#[derive(Debug, Clone, Copy)]
enum Touched {
    Employees,
    Locations,
}

/// The live roster of a running process.
///
/// Mutations are serialized through one lock and every one of them writes the
/// affected document back before the lock is released. A failed write is only
/// logged, the in-memory roster stays authoritative.
pub struct Session {
    roster: Mutex<Roster>,
    store: DocumentStore,
    today: RwLock<NaiveDate>,
}

impl Session {
    pub fn new(roster: Roster, store: DocumentStore, today: NaiveDate) -> Self {
        Self {
            roster: Mutex::new(roster),
            store,
            today: RwLock::new(today),
        }
    }

    /// Restores both documents, normalizing legacy employee records
    pub async fn load(store: DocumentStore) -> Result<Self, StoreError> {
        let employees = store.load_employees().await?;
        let locations = store.load_locations().await?;

        info!(employees = employees.len(), locations = locations.len(), "roster restored");

        let roster = Roster::new(employees, locations);
        let session = Self::new(roster, store, Local::now().date_naive());

        // normalized records are written back once
        if let Err(error) = session.save_all().await {
            warn!(%error, "unable to write back normalized roster");
        }

        Ok(session)
    }

    pub fn today(&self) -> NaiveDate {
        *self.today.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns whether the date actually moved
    pub fn refresh_today(&self, today: NaiveDate) -> bool {
        let mut current = self.today.write().unwrap_or_else(PoisonError::into_inner);
        if *current == today {
            return false;
        }

        info!(from = %*current, to = %today, "day rolled over");
        *current = today;
        true
    }

    /// Runs a query against a consistent view of the roster
    pub async fn read<R>(&self, query: impl FnOnce(&Roster) -> R) -> R {
        let roster = self.roster.lock().await;
        query(&roster)
    }

    /// Writes both documents, reporting failure to the caller
    pub async fn save_all(&self) -> Result<(), StoreError> {
        let roster = self.roster.lock().await;

        self.store.save_employees(roster.employees()).await?;
        self.store.save_locations(roster.locations()).await?;

        Ok(())
    }

    async fn persist(&self, roster: &Roster, touched: Touched) {
        let result = match touched {
            Touched::Employees => self.store.save_employees(roster.employees()).await,
            Touched::Locations => self.store.save_locations(roster.locations()).await,
        };

        if let Err(error) = result {
            warn!(?touched, %error, "unable to persist roster, keeping in-memory state");
        }
    }

    pub async fn add_employee(&self, form: EmployeeForm) -> Result<EmployeeId, ValidationError> {
        let mut roster = self.roster.lock().await;

        let id = roster.add_employee(form)?;
        self.persist(&roster, Touched::Employees).await;

        Ok(id)
    }

    pub async fn update_employee(&self, id: &EmployeeId, form: EmployeeForm) -> Result<bool, ValidationError> {
        let mut roster = self.roster.lock().await;

        let updated = roster.update_employee(id, form)?;
        if updated {
            self.persist(&roster, Touched::Employees).await;
        }

        Ok(updated)
    }

    pub async fn remove_employee(&self, id: &EmployeeId) -> bool {
        let mut roster = self.roster.lock().await;

        let removed = roster.remove_employee(id);
        if removed {
            self.persist(&roster, Touched::Employees).await;
        }

        removed
    }

    pub async fn clear_employees(&self) {
        let mut roster = self.roster.lock().await;

        roster.clear_employees();
        self.persist(&roster, Touched::Employees).await;
    }

    pub async fn cycle_attendance(
        &self,
        id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<AttendanceStatus>, ValidationError> {
        let mut roster = self.roster.lock().await;

        let status = roster.cycle_attendance(id, date)?;
        if status.is_some() {
            self.persist(&roster, Touched::Employees).await;
        }

        Ok(status)
    }

    pub async fn add_advance(&self, id: &EmployeeId, form: AdvanceForm) -> Result<Option<AdvanceId>, ValidationError> {
        let mut roster = self.roster.lock().await;

        let advance_id = roster.add_advance(id, form)?;
        if advance_id.is_some() {
            self.persist(&roster, Touched::Employees).await;
        }

        Ok(advance_id)
    }

    pub async fn remove_advance(&self, id: &EmployeeId, advance_id: &AdvanceId) -> bool {
        let mut roster = self.roster.lock().await;

        let removed = roster.remove_advance(id, advance_id);
        if removed {
            self.persist(&roster, Touched::Employees).await;
        }

        removed
    }

    pub async fn add_location(&self, name: &str) -> Result<LocationId, ValidationError> {
        let mut roster = self.roster.lock().await;

        let id = roster.add_location(name)?;
        self.persist(&roster, Touched::Locations).await;

        Ok(id)
    }

    /// Replaces every employee with the document's contents, returning how many
    /// were imported. A rejected document leaves the roster untouched.
    pub async fn import_employees(&self, document: &str) -> Result<usize, ImportError> {
        let employees = roster::parse_import(document)?;
        let count = employees.len();

        let mut roster = self.roster.lock().await;
        roster.replace_employees(employees);
        self.persist(&roster, Touched::Employees).await;

        Ok(count)
    }

    pub async fn export_employees(&self) -> Result<String, serde_json::Error> {
        let roster = self.roster.lock().await;
        roster::export(roster.employees())
    }
}
