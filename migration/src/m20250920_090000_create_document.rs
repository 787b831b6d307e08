use sea_orm_migration::prelude::*;

use crate::util::default_table_statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Whole documents keyed by name, e.g. `attendanceEmployees`.
        // Values are JSON text and are always rewritten in full.
        manager
            .create_table(default_table_statement()
                .table(Document::Table)
                .col(ColumnDef::new(Document::Key)
                    .text()
                    .primary_key()
                    .not_null())
                .col(ColumnDef::new(Document::Value)
                    .text()
                    .not_null())
                .take()
            ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                TableDropStatement::new()
                    .table(Document::Table)
                    .take()
            ).await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Key,
    Value,
}
