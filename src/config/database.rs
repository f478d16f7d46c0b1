//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL.

use crate::entities::{
    ActualExpense, Allocation, Budget, Dataset, ExpenseMapping, Member, Purchase, PurchaseMapping,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/budget_buddy.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the `SQLite` database using the
/// `DATABASE_URL` environment variable, falling back to a local file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Creates tables for datasets, members, budgets, purchases, allocations,
/// actual expenses, and both import-mapping scopes.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        schema.create_table_from_entity(Dataset),
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(Budget),
        schema.create_table_from_entity(Purchase),
        schema.create_table_from_entity(Allocation),
        schema.create_table_from_entity(ActualExpense),
        schema.create_table_from_entity(PurchaseMapping),
        schema.create_table_from_entity(ExpenseMapping),
    ];
    for mut statement in statements {
        statement.if_not_exists();
        db.execute(builder.build(&statement)).await?;
    }

    Ok(())
}
