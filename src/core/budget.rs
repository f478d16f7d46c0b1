//! Budget business logic - envelope CRUD and the merge operator.
//!
//! A budget's id is immutable once created; updates touch name, amount,
//! unit, and description only. Deleting a budget removes its allocations,
//! actual expenses, and import mapping in one transaction. Merging re-points
//! everything from a source budget to a target budget without losing or
//! double-counting money.

use crate::{
    entities::{
        ActualExpense, Allocation, Budget, Dataset, ExpenseMapping, actual_expense, allocation,
        budget, expense_mapping,
    },
    errors::{Error, Result},
};
use sea_orm::{
    DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use std::collections::HashSet;
use tracing::debug;

/// Everything needed to create a budget envelope.
#[derive(Debug, Clone)]
pub struct BudgetInput {
    /// Optional user-assigned id; a UUID is generated when absent
    pub id: Option<String>,
    /// Name of the envelope
    pub name: String,
    /// Total envelope amount for the period
    pub total_amount: f64,
    /// Display unit label
    pub unit: String,
    /// Optional free-text description
    pub description: Option<String>,
}

/// Partial update of a budget. The id is deliberately not here: identity is
/// immutable once created.
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    /// New envelope name
    pub name: Option<String>,
    /// New total amount
    pub total_amount: Option<f64>,
    /// New unit label
    pub unit: Option<String>,
    /// New description (`Some(None)` clears it)
    pub description: Option<Option<String>>,
}

fn validate_total_amount(total_amount: f64) -> Result<()> {
    if !total_amount.is_finite() || total_amount < 0.0 {
        return Err(Error::Validation {
            message: format!("total amount must be a non-negative number, got {total_amount}"),
        });
    }
    Ok(())
}

/// The set of budget ids belonging to a dataset, used to validate
/// allocations.
pub(crate) async fn budget_id_set<C>(conn: &C, dataset_id: &str) -> Result<HashSet<String>>
where
    C: ConnectionTrait,
{
    Ok(Budget::find()
        .filter(budget::Column::DatasetId.eq(dataset_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect())
}

/// Creates a budget envelope in a dataset.
///
/// # Errors
/// * [`Error::UnknownDataset`] when the dataset does not exist
/// * [`Error::Validation`] for an empty name, a negative/non-finite total
///   amount, or an id already taken within the dataset
pub async fn create_budget(
    db: &DatabaseConnection,
    dataset_id: &str,
    input: BudgetInput,
) -> Result<budget::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "budget name cannot be empty".to_string(),
        });
    }
    validate_total_amount(input.total_amount)?;

    Dataset::find_by_id(dataset_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownDataset {
            id: dataset_id.to_string(),
        })?;

    let id = match input.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    if Budget::find_by_id(id.as_str()).one(db).await?.is_some() {
        return Err(Error::Validation {
            message: format!("budget id already exists: {id}"),
        });
    }

    let model = budget::ActiveModel {
        id: Set(id),
        dataset_id: Set(dataset_id.to_string()),
        name: Set(input.name.trim().to_string()),
        total_amount: Set(input.total_amount),
        unit: Set(input.unit),
        description: Set(input.description),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves a budget by id.
pub async fn get_budget(db: &DatabaseConnection, budget_id: &str) -> Result<budget::Model> {
    Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownBudget {
            id: budget_id.to_string(),
        })
}

/// Lists the budgets of a dataset, ordered alphabetically by name.
pub async fn list_budgets(
    db: &DatabaseConnection,
    dataset_id: &str,
) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::DatasetId.eq(dataset_id))
        .order_by_asc(budget::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a budget. Identity never changes.
pub async fn update_budget(
    db: &DatabaseConnection,
    budget_id: &str,
    update: BudgetUpdate,
) -> Result<budget::Model> {
    let existing = get_budget(db, budget_id).await?;

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                message: "budget name cannot be empty".to_string(),
            });
        }
    }
    if let Some(total_amount) = update.total_amount {
        validate_total_amount(total_amount)?;
    }

    let mut model: budget::ActiveModel = existing.into();
    if let Some(name) = update.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(total_amount) = update.total_amount {
        model.total_amount = Set(total_amount);
    }
    if let Some(unit) = update.unit {
        model.unit = Set(unit);
    }
    if let Some(description) = update.description {
        model.description = Set(description);
    }
    model.update(db).await.map_err(Into::into)
}

/// Deletes a budget together with its allocations, actual expenses, and
/// import mapping, as one atomic unit. Purchases that were split into this
/// budget keep their other allocations and surface as mismatched on read.
pub async fn delete_budget(db: &DatabaseConnection, budget_id: &str) -> Result<()> {
    let existing = get_budget(db, budget_id).await?;

    let txn = db.begin().await?;
    Allocation::delete_many()
        .filter(allocation::Column::BudgetId.eq(budget_id))
        .exec(&txn)
        .await?;
    ActualExpense::delete_many()
        .filter(actual_expense::Column::BudgetId.eq(budget_id))
        .exec(&txn)
        .await?;
    ExpenseMapping::delete_many()
        .filter(expense_mapping::Column::BudgetId.eq(budget_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Merges the source budget into the target budget and removes the source.
///
/// Executed as a single storage transaction: the target absorbs the
/// source's total amount; every allocation referencing the source is
/// re-pointed to the target, summing into one row when the purchase already
/// held a target allocation; every actual expense is re-pointed; the
/// source's import mapping is carried over when the target has none; the
/// source row is deleted. The total money allocated and expensed across the
/// dataset is identical before and after.
///
/// # Errors
/// * [`Error::InvalidMergeTarget`] when source and target are the same id
/// * [`Error::UnknownBudget`] when either id does not exist in the same
///   dataset
pub async fn merge_budgets(
    db: &DatabaseConnection,
    source_budget_id: &str,
    target_budget_id: &str,
) -> Result<budget::Model> {
    if source_budget_id == target_budget_id {
        return Err(Error::InvalidMergeTarget {
            id: source_budget_id.to_string(),
        });
    }

    let txn = db.begin().await?;

    let source = Budget::find_by_id(source_budget_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::UnknownBudget {
            id: source_budget_id.to_string(),
        })?;
    let target = Budget::find_by_id(target_budget_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::UnknownBudget {
            id: target_budget_id.to_string(),
        })?;
    if source.dataset_id != target.dataset_id {
        return Err(Error::UnknownBudget {
            id: source_budget_id.to_string(),
        });
    }

    // The merged envelope keeps the combined budget
    let combined_total = source.total_amount + target.total_amount;
    let mut target_model: budget::ActiveModel = target.into();
    target_model.total_amount = Set(combined_total);
    target_model.update(&txn).await?;

    // Re-point allocations, collapsing (purchase, target) duplicates into a
    // single row so no purchase ends up split twice into the same budget
    let source_allocations = Allocation::find()
        .filter(allocation::Column::BudgetId.eq(source_budget_id))
        .all(&txn)
        .await?;
    for source_allocation in source_allocations {
        let existing_target_allocation = Allocation::find()
            .filter(allocation::Column::BudgetId.eq(target_budget_id))
            .filter(allocation::Column::PurchaseId.eq(source_allocation.purchase_id))
            .one(&txn)
            .await?;

        if let Some(existing) = existing_target_allocation {
            let merged_amount = existing.amount + source_allocation.amount;
            let mut existing_model: allocation::ActiveModel = existing.into();
            existing_model.amount = Set(merged_amount);
            existing_model.update(&txn).await?;
            source_allocation.delete(&txn).await?;
        } else {
            let mut moved: allocation::ActiveModel = source_allocation.into();
            moved.budget_id = Set(target_budget_id.to_string());
            moved.update(&txn).await?;
        }
    }

    // Re-point actual expenses wholesale
    ActualExpense::update_many()
        .col_expr(
            actual_expense::Column::BudgetId,
            Expr::value(target_budget_id.to_string()),
        )
        .filter(actual_expense::Column::BudgetId.eq(source_budget_id))
        .exec(&txn)
        .await?;

    // Carry the import mapping over when the target has none
    let source_mapping = ExpenseMapping::find_by_id(source_budget_id).one(&txn).await?;
    if let Some(source_mapping) = source_mapping {
        let target_has_mapping = ExpenseMapping::find_by_id(target_budget_id)
            .one(&txn)
            .await?
            .is_some();
        if !target_has_mapping {
            expense_mapping::ActiveModel {
                budget_id: Set(target_budget_id.to_string()),
                mapping_json: Set(source_mapping.mapping_json.clone()),
            }
            .insert(&txn)
            .await?;
        }
        source_mapping.delete(&txn).await?;
    }

    source.delete(&txn).await?;
    txn.commit().await?;

    debug!(source = source_budget_id, target = target_budget_id, "merged budgets");
    get_budget(db, target_budget_id).await
}
