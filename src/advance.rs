use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{calendar::MonthRef, error::ValidationError, ids::AdvanceId};

/// A salary advance paid out on `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceEntry {
    pub id: AdvanceId,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceSummary {
    pub total_amount: f64,
    pub latest_date: Option<NaiveDate>,
    pub count: usize,
}

/// Checks an advance submission, yielding its date
pub fn validate(amount: f64, date: Option<NaiveDate>) -> Result<NaiveDate, ValidationError> {
    // also rejects NaN and infinities
    if !(amount.is_finite() && amount > 0.0) {
        return Err(ValidationError::NonPositiveAdvance);
    }

    date.ok_or(ValidationError::MissingAdvanceDate)
}

/// Advances of one employee, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvanceLedger(Vec<AdvanceEntry>);

impl AdvanceLedger {
    pub fn entries(&self) -> &[AdvanceEntry] {
        &self.0
    }

    pub fn add(
        &mut self,
        amount: f64,
        date: Option<NaiveDate>,
        note: Option<String>,
    ) -> Result<AdvanceId, ValidationError> {
        let date = validate(amount, date)?;

        let id = AdvanceId::generate();
        self.0.push(AdvanceEntry {
            id: id.clone(),
            amount,
            date,
            note: note
                .map(|note| note.trim().to_owned())
                .filter(|note| !note.is_empty()),
            created_at: Utc::now(),
        });

        Ok(id)
    }

    /// Rewrites the amount and date of the most recent entry, keeping its id.
    /// An empty ledger gets a fresh entry instead.
    pub fn replace_latest(&mut self, amount: f64, date: Option<NaiveDate>) -> Result<AdvanceId, ValidationError> {
        let date = validate(amount, date)?;

        let Some(latest) = self.0.last_mut() else {
            return self.add(amount, Some(date), None);
        };

        latest.amount = amount;
        latest.date = date;

        Ok(latest.id.clone())
    }

    /// `false` when no entry has `id`
    pub fn remove(&mut self, id: &AdvanceId) -> bool {
        let before = self.0.len();
        self.0.retain(|entry| &entry.id != id);

        self.0.len() != before
    }

    pub fn monthly_summary(&self, month: MonthRef) -> AdvanceSummary {
        self.0
            .iter()
            .filter(|entry| month.contains(entry.date))
            .fold(AdvanceSummary::default(), |mut summary, entry| {
                summary.total_amount += entry.amount;
                summary.latest_date = summary.latest_date.max(Some(entry.date));
                summary.count += 1;
                summary
            })
    }
}

/// The single advance older records carried as two scalar fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAdvance {
    #[serde(default, rename = "advance", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, rename = "advanceDate", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl LegacyAdvance {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.date.is_none()
    }
}

/// Folds the legacy scalar advance into the list representation.
///
/// The legacy fields are always cleared. They only turn into an entry when no
/// list exists yet and the amount is positive. An already migrated record is
/// left as it is.
pub fn migrate_legacy(advances: &mut Option<AdvanceLedger>, legacy: &mut LegacyAdvance) {
    let LegacyAdvance { amount, date } = std::mem::take(legacy);

    if advances.is_some() {
        return;
    }

    let mut ledger = AdvanceLedger::default();

    if let Some(amount) = amount.filter(|amount| *amount > 0.0) {
        let date = date
            .and_then(|date| date.parse::<NaiveDate>().ok())
            .unwrap_or_else(|| Local::now().date_naive());

        ledger.0.push(AdvanceEntry {
            id: AdvanceId::generate(),
            amount,
            date,
            note: None,
            created_at: Utc::now(),
        });
    }

    *advances = Some(ledger);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_add_validation() {
        let mut ledger = AdvanceLedger::default();

        assert_eq!(ledger.add(0.0, Some(date(2025, 9, 1)), None), Err(ValidationError::NonPositiveAdvance));
        assert_eq!(ledger.add(-5.0, Some(date(2025, 9, 1)), None), Err(ValidationError::NonPositiveAdvance));
        assert_eq!(ledger.add(f64::NAN, Some(date(2025, 9, 1)), None), Err(ValidationError::NonPositiveAdvance));
        assert_eq!(ledger.add(f64::INFINITY, Some(date(2025, 9, 1)), None), Err(ValidationError::NonPositiveAdvance));
        assert_eq!(ledger.add(100.0, None, None), Err(ValidationError::MissingAdvanceDate));
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn test_add_and_remove() {
        let mut ledger = AdvanceLedger::default();

        let first = ledger.add(100.0, Some(date(2025, 9, 10)), Some("  rent ".to_owned())).unwrap();
        let second = ledger.add(50.0, Some(date(2025, 9, 1)), Some(" ".to_owned())).unwrap();

        assert_ne!(first, second);
        // insertion order, not date order
        assert_eq!(ledger.entries()[0].id, first);
        assert_eq!(ledger.entries()[0].note.as_deref(), Some("rent"));
        assert_eq!(ledger.entries()[1].note, None);

        assert!(ledger.remove(&first));
        assert!(!ledger.remove(&first));
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn test_replace_latest() {
        let mut ledger = AdvanceLedger::default();

        let first = ledger.add(100.0, Some(date(2025, 9, 1)), None).unwrap();
        let latest = ledger.add(50.0, Some(date(2025, 9, 2)), Some("fuel".to_owned())).unwrap();

        assert_eq!(ledger.replace_latest(75.0, Some(date(2025, 9, 8))), Ok(latest.clone()));
        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(ledger.entries()[0].id, first);
        assert_eq!(ledger.entries()[0].amount, 100.0);
        assert_eq!(ledger.entries()[1].amount, 75.0);
        assert_eq!(ledger.entries()[1].date, date(2025, 9, 8));
        assert_eq!(ledger.entries()[1].note.as_deref(), Some("fuel"));

        assert_eq!(ledger.replace_latest(f64::INFINITY, Some(date(2025, 9, 8))), Err(ValidationError::NonPositiveAdvance));
        assert_eq!(ledger.entries()[1].amount, 75.0);
    }

    #[test]
    fn test_replace_latest_on_empty_ledger() {
        let mut ledger = AdvanceLedger::default();

        let id = ledger.replace_latest(30.0, Some(date(2025, 9, 4))).unwrap();

        assert_eq!(ledger.entries().len(), 1);
        assert_eq!(ledger.entries()[0].id, id);
        assert_eq!(ledger.entries()[0].amount, 30.0);
    }

    #[test]
    fn test_monthly_summary() {
        let mut ledger = AdvanceLedger::default();

        ledger.add(100.0, Some(date(2025, 9, 10)), None).unwrap();
        ledger.add(150.0, Some(date(2025, 9, 10)), None).unwrap();
        ledger.add(40.0, Some(date(2025, 9, 3)), None).unwrap();
        ledger.add(999.0, Some(date(2025, 10, 1)), None).unwrap();
        ledger.add(999.0, Some(date(2024, 9, 20)), None).unwrap();

        let summary = ledger.monthly_summary(MonthRef::new(2025, 9).unwrap());
        assert_eq!(summary.total_amount, 290.0);
        assert_eq!(summary.latest_date, Some(date(2025, 9, 10)));
        assert_eq!(summary.count, 3);

        let empty = ledger.monthly_summary(MonthRef::new(2025, 11).unwrap());
        assert_eq!(empty, AdvanceSummary::default());
    }

    #[test]
    fn test_migrate_legacy() {
        let mut advances = None;
        let mut legacy = LegacyAdvance { amount: Some(500.0), date: Some("2025-09-01".to_owned()) };

        migrate_legacy(&mut advances, &mut legacy);

        let ledger = advances.clone().unwrap();
        assert_eq!(ledger.entries().len(), 1);
        assert_eq!(ledger.entries()[0].amount, 500.0);
        assert_eq!(ledger.entries()[0].date, date(2025, 9, 1));
        assert!(legacy.is_empty());

        // second pass is a no-op
        migrate_legacy(&mut advances, &mut legacy);
        assert_eq!(advances, Some(ledger));
    }

    #[test]
    fn test_migrate_legacy_zero_amount() {
        let mut advances = None;
        let mut legacy = LegacyAdvance { amount: Some(0.0), date: Some("2025-09-01".to_owned()) };

        migrate_legacy(&mut advances, &mut legacy);

        assert_eq!(advances, Some(AdvanceLedger::default()));
        assert!(legacy.is_empty());
    }

    #[test]
    fn test_migrate_legacy_keeps_existing_list() {
        let mut existing = AdvanceLedger::default();
        existing.add(10.0, Some(date(2025, 9, 2)), None).unwrap();

        let mut advances = Some(existing.clone());
        let mut legacy = LegacyAdvance { amount: Some(500.0), date: None };

        migrate_legacy(&mut advances, &mut legacy);

        assert_eq!(advances, Some(existing));
        assert!(legacy.is_empty());
    }

    #[test]
    fn test_migrate_legacy_without_date_uses_today() {
        let mut advances = None;
        let mut legacy = LegacyAdvance { amount: Some(20.0), date: Some(String::new()) };

        migrate_legacy(&mut advances, &mut legacy);

        assert_eq!(advances.unwrap().entries()[0].date, Local::now().date_naive());
    }

    #[test]
    fn test_stored_entry_shape() {
        let entry: AdvanceEntry = serde_json::from_str(
            r#"{"id":1757000000000,"amount":300,"date":"2025-09-01","notes":"fuel"}"#
        ).unwrap();

        assert_eq!(entry.id.as_str(), "1757000000000");
        assert_eq!(entry.amount, 300.0);
        assert_eq!(entry.note.as_deref(), Some("fuel"));
    }
}
