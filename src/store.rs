use chrono::Local;
use sea_orm::{sea_query::OnConflict, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    consts::{EMPLOYEES_DOCUMENT, LOCATIONS_DOCUMENT},
    entity::{document, prelude::*},
    roster::{Employee, Location},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] DbErr),
    #[error("stored document `{key}` is corrupt")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to encode document")]
    Encode(#[from] serde_json::Error),
}

/// Key-value storage of whole documents. No document is ever diffed.
pub struct DocumentStore {
    db: DatabaseConnection,
}

impl DocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// An absent document reads as the empty value
    async fn load<T: DeserializeOwned + Default>(&self, key: &'static str) -> Result<T, StoreError> {
        let Some(document) = Document::find_by_id(key.to_owned())
            .one(&self.db).await?
        else {
            debug!(key, "document absent");
            return Ok(T::default());
        };

        serde_json::from_str(&document.value)
            .map_err(|source| StoreError::Corrupt { key, source })
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let model = document::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(serde_json::to_string(value)?),
            updated_at: Set(Local::now().fixed_offset()),
        };

        Document::insert(model)
            .on_conflict(OnConflict::column(document::Column::Key)
                .update_columns([document::Column::Value, document::Column::UpdatedAt])
                .to_owned())
            .exec_without_returning(&self.db).await?;

        debug!(key, "document saved");
        Ok(())
    }

    /// Records in the legacy shape come back normalized
    pub async fn load_employees(&self) -> Result<Vec<Employee>, StoreError> {
        self.load(EMPLOYEES_DOCUMENT).await
    }

    pub async fn load_locations(&self) -> Result<Vec<Location>, StoreError> {
        self.load(LOCATIONS_DOCUMENT).await
    }

    pub async fn save_employees(&self, employees: &[Employee]) -> Result<(), StoreError> {
        self.save(EMPLOYEES_DOCUMENT, employees).await
    }

    pub async fn save_locations(&self, locations: &[Location]) -> Result<(), StoreError> {
        self.save(LOCATIONS_DOCUMENT, locations).await
    }
}
