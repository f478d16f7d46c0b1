//! Shared test utilities for `BudgetBuddy`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    core::{
        allocation::AllocationInput,
        budget::{self, BudgetInput},
        dataset, expense,
        member,
        purchase::{self, PurchaseCategory, PurchaseInput, PurchaseRecord, PurchaseStatus},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test dataset with the given name.
pub async fn create_test_dataset(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::dataset::Model> {
    dataset::create_dataset(db, name).await
}

/// Creates a test budget with an explicit id.
///
/// # Defaults
/// * `name`: the id itself
/// * `unit`: `"USD"`
/// * `description`: None
pub async fn create_test_budget(
    db: &DatabaseConnection,
    dataset_id: &str,
    id: &str,
    total_amount: f64,
) -> Result<entities::budget::Model> {
    budget::create_budget(
        db,
        dataset_id,
        BudgetInput {
            id: Some(id.to_string()),
            name: id.to_string(),
            total_amount,
            unit: "USD".to_string(),
            description: None,
        },
    )
    .await
}

/// Creates a test member.
pub async fn create_test_member(
    db: &DatabaseConnection,
    dataset_id: &str,
    name: &str,
) -> Result<entities::member::Model> {
    member::create_member(db, dataset_id, name).await
}

/// Builds a purchase input with sensible defaults.
///
/// # Defaults
/// * `member_name`: None
/// * `category`: [`PurchaseCategory::Other`]
/// * `unit`: `"USD"`
/// * `status`: [`PurchaseStatus::Drafted`]
/// * `priority`: 3
#[must_use]
pub fn purchase_input(
    item_name: &str,
    amount: f64,
    allocations: &[(&str, f64)],
) -> PurchaseInput {
    PurchaseInput {
        member_name: None,
        category: PurchaseCategory::Other,
        item_name: item_name.to_string(),
        amount,
        unit: "USD".to_string(),
        status: PurchaseStatus::Drafted,
        priority: 3,
        note: None,
        allocations: allocations
            .iter()
            .map(|(budget_id, amount)| AllocationInput {
                budget_id: (*budget_id).to_string(),
                amount: *amount,
            })
            .collect(),
    }
}

/// Creates a test purchase with the default input shape.
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    dataset_id: &str,
    item_name: &str,
    amount: f64,
    allocations: &[(&str, f64)],
) -> Result<PurchaseRecord> {
    purchase::create_purchase(db, dataset_id, purchase_input(item_name, amount, allocations)).await
}

/// Books a test actual expense.
///
/// # Defaults
/// * `item_name`: `"Test expense"`
/// * `unit`: `"USD"`
pub async fn create_test_expense(
    db: &DatabaseConnection,
    budget_id: &str,
    amount: f64,
) -> Result<entities::actual_expense::Model> {
    expense::create_actual_expense(
        db,
        budget_id,
        expense::ExpenseInput {
            item_name: Some("Test expense".to_string()),
            amount,
            unit: "USD".to_string(),
        },
    )
    .await
}

/// Sets up a complete test environment with a dataset.
/// Returns (db, dataset) for common test scenarios.
pub async fn setup_with_dataset() -> Result<(DatabaseConnection, entities::dataset::Model)> {
    let db = setup_test_db().await?;
    let dataset = create_test_dataset(&db, "Test Dataset").await?;
    Ok((db, dataset))
}

/// Sets up a complete test environment with a dataset and one budget
/// (`"budget-a"`, 100.0). Returns (db, dataset, budget).
pub async fn setup_with_budget() -> Result<(
    DatabaseConnection,
    entities::dataset::Model,
    entities::budget::Model,
)> {
    let db = setup_test_db().await?;
    let dataset = create_test_dataset(&db, "Test Dataset").await?;
    let budget = create_test_budget(&db, &dataset.id, "budget-a", 100.0).await?;
    Ok((db, dataset, budget))
}
