//! Dataset business logic - accounting-period CRUD and the rollover
//! operator.
//!
//! A dataset is the ownership root: deleting one removes every record it
//! owns, in a single transaction. Rollover starts a new period, optionally
//! copying members, budget envelopes (as zeroed templates), and the
//! dataset's persisted import settings - always with fresh identities, so
//! the new period is independently mutable.

use crate::{
    entities::{
        ActualExpense, Allocation, Budget, Dataset, ExpenseMapping, Member, Purchase,
        PurchaseMapping, actual_expense, allocation, budget, dataset, expense_mapping, member,
        purchase, purchase_mapping,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::debug;

/// Parameters of a dataset rollover.
#[derive(Debug, Clone)]
pub struct RolloverParams {
    /// Name of the new dataset
    pub new_name: String,
    /// Dataset to copy from; `None` starts the new period empty
    pub source_dataset_id: Option<String>,
    /// Copy budget envelopes as templates (zero actuals, zero plans)
    pub carry_budgets: bool,
    /// Copy member names
    pub carry_members: bool,
    /// Copy the dataset's persisted import settings
    pub carry_settings: bool,
}

/// What a rollover actually copied.
#[derive(Debug, Clone)]
pub struct RolloverOutcome {
    /// The newly created dataset
    pub dataset: dataset::Model,
    /// Number of budget templates copied
    pub budgets_copied: usize,
    /// Number of members copied
    pub members_copied: usize,
    /// Whether the import settings were copied
    pub settings_copied: bool,
}

/// Creates a dataset.
pub async fn create_dataset(db: &DatabaseConnection, name: &str) -> Result<dataset::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "dataset name cannot be empty".to_string(),
        });
    }

    let model = dataset::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves a dataset by id.
pub async fn get_dataset(db: &DatabaseConnection, dataset_id: &str) -> Result<dataset::Model> {
    Dataset::find_by_id(dataset_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownDataset {
            id: dataset_id.to_string(),
        })
}

/// Lists all datasets, newest first.
pub async fn list_datasets(db: &DatabaseConnection) -> Result<Vec<dataset::Model>> {
    Dataset::find()
        .order_by_desc(dataset::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Renames a dataset.
pub async fn rename_dataset(
    db: &DatabaseConnection,
    dataset_id: &str,
    name: &str,
) -> Result<dataset::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "dataset name cannot be empty".to_string(),
        });
    }

    let existing = get_dataset(db, dataset_id).await?;
    let mut model: dataset::ActiveModel = existing.into();
    model.name = Set(name.trim().to_string());
    model.update(db).await.map_err(Into::into)
}

/// Deletes a dataset and everything it owns - members, budgets, purchases,
/// allocations, actual expenses, and import mappings - as one atomic unit.
pub async fn delete_dataset(db: &DatabaseConnection, dataset_id: &str) -> Result<()> {
    let existing = get_dataset(db, dataset_id).await?;

    let txn = db.begin().await?;

    let purchase_ids: Vec<i64> = Purchase::find()
        .filter(purchase::Column::DatasetId.eq(dataset_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if !purchase_ids.is_empty() {
        Allocation::delete_many()
            .filter(allocation::Column::PurchaseId.is_in(purchase_ids))
            .exec(&txn)
            .await?;
    }
    Purchase::delete_many()
        .filter(purchase::Column::DatasetId.eq(dataset_id))
        .exec(&txn)
        .await?;

    let budget_ids: Vec<String> = Budget::find()
        .filter(budget::Column::DatasetId.eq(dataset_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();
    if !budget_ids.is_empty() {
        ActualExpense::delete_many()
            .filter(actual_expense::Column::BudgetId.is_in(budget_ids.clone()))
            .exec(&txn)
            .await?;
        ExpenseMapping::delete_many()
            .filter(expense_mapping::Column::BudgetId.is_in(budget_ids))
            .exec(&txn)
            .await?;
    }
    Budget::delete_many()
        .filter(budget::Column::DatasetId.eq(dataset_id))
        .exec(&txn)
        .await?;

    Member::delete_many()
        .filter(member::Column::DatasetId.eq(dataset_id))
        .exec(&txn)
        .await?;
    PurchaseMapping::delete_many()
        .filter(purchase_mapping::Column::DatasetId.eq(dataset_id))
        .exec(&txn)
        .await?;

    existing.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Creates a new dataset for the next period, optionally carrying state
/// over from a source dataset. Everything is copied with fresh identities:
/// budgets arrive as templates (same name, total amount, unit, description;
/// no allocations, no expenses), members arrive as names only, and the
/// dataset-scoped import mapping is cloned when `carry_settings` is set.
/// Runs as one atomic unit.
///
/// # Errors
/// * [`Error::UnknownDataset`] when a source id is given but does not exist
/// * [`Error::Validation`] for an empty new name
pub async fn rollover_dataset(
    db: &DatabaseConnection,
    params: RolloverParams,
) -> Result<RolloverOutcome> {
    if params.new_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "dataset name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let source = match &params.source_dataset_id {
        Some(source_id) => Some(
            Dataset::find_by_id(source_id)
                .one(&txn)
                .await?
                .ok_or_else(|| Error::UnknownDataset {
                    id: source_id.clone(),
                })?,
        ),
        None => None,
    };

    let new_dataset = dataset::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(params.new_name.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&txn)
    .await?;

    let mut budgets_copied = 0;
    let mut members_copied = 0;
    let mut settings_copied = false;

    if let Some(source) = source {
        if params.carry_members {
            let members = Member::find()
                .filter(member::Column::DatasetId.eq(source.id.as_str()))
                .all(&txn)
                .await?;
            for old in members {
                member::ActiveModel {
                    dataset_id: Set(new_dataset.id.clone()),
                    name: Set(old.name),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                members_copied += 1;
            }
        }

        if params.carry_budgets {
            let budgets = Budget::find()
                .filter(budget::Column::DatasetId.eq(source.id.as_str()))
                .all(&txn)
                .await?;
            for old in budgets {
                // A template only: the new period starts financially at zero
                budget::ActiveModel {
                    id: Set(uuid::Uuid::new_v4().to_string()),
                    dataset_id: Set(new_dataset.id.clone()),
                    name: Set(old.name),
                    total_amount: Set(old.total_amount),
                    unit: Set(old.unit),
                    description: Set(old.description),
                }
                .insert(&txn)
                .await?;
                budgets_copied += 1;
            }
        }

        if params.carry_settings {
            let mapping = PurchaseMapping::find_by_id(source.id.as_str()).one(&txn).await?;
            if let Some(mapping) = mapping {
                purchase_mapping::ActiveModel {
                    dataset_id: Set(new_dataset.id.clone()),
                    mapping_json: Set(mapping.mapping_json),
                }
                .insert(&txn)
                .await?;
                settings_copied = true;
            }
        }
    }

    txn.commit().await?;

    debug!(
        dataset = %new_dataset.id,
        budgets_copied, members_copied, settings_copied, "rolled over dataset"
    );
    Ok(RolloverOutcome {
        dataset: new_dataset,
        budgets_copied,
        members_copied,
        settings_copied,
    })
}
