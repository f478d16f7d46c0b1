//! CSV import gateway and persisted column mappings.
//!
//! Delimited-text rows become purchases (dataset-scoped, multi-column path)
//! or actual expenses (budget-scoped, single-column legacy path) via a
//! caller-supplied column mapping. A failing row never aborts the batch:
//! the outcome enumerates row-level failures next to the count of imported
//! rows. The mapping used for a successful import is persisted for its
//! scope so the next import can pre-fill it.

use crate::{
    core::{
        allocation::AllocationInput,
        budget::budget_id_set,
        purchase::{
            PurchaseCategory, PurchaseInput, PurchaseStatus, clear_purchases,
            insert_purchase_with_allocations,
        },
    },
    entities::{
        ActualExpense, Budget, Dataset, ExpenseMapping, PurchaseMapping, actual_expense,
        expense_mapping, purchase_mapping,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Maps the engine's logical fields to the column headers of a source file.
/// `item_name` and `amount` are required for any import; the rest are
/// optional and default when unmapped. Persisted as JSON per scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Column holding the item name (required)
    pub item_name: Option<String>,
    /// Column holding the total amount (required)
    pub amount: Option<String>,
    /// Column holding the member attribution
    pub member_name: Option<String>,
    /// Column holding the category
    pub category: Option<String>,
    /// Column holding the priority
    pub priority: Option<String>,
    /// Column holding the free-text note
    pub note: Option<String>,
    /// Column holding the status
    pub status: Option<String>,
    /// Column holding the allocated budget id
    pub budget_id: Option<String>,
    /// Column holding the allocated amount
    pub allocation_amount: Option<String>,
}

/// One row that could not be imported.
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// 1-based line number in the source file (the header is line 1)
    pub row: usize,
    /// Why the row was rejected
    pub reason: String,
}

/// Outcome of an import batch: partial success is explicit, never inferred.
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Number of rows imported
    pub imported: usize,
    /// Rows that were rejected, with reasons
    pub failures: Vec<RowFailure>,
}

/// Reads the persisted purchase-import mapping of a dataset.
pub async fn get_purchase_mapping(
    db: &DatabaseConnection,
    dataset_id: &str,
) -> Result<Option<ColumnMapping>> {
    match PurchaseMapping::find_by_id(dataset_id).one(db).await? {
        Some(row) => parse_mapping(&row.mapping_json).map(Some),
        None => Ok(None),
    }
}

/// Upserts the purchase-import mapping of a dataset.
pub async fn save_purchase_mapping<C>(
    conn: &C,
    dataset_id: &str,
    mapping: &ColumnMapping,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let mapping_json = serialize_mapping(mapping)?;
    match PurchaseMapping::find_by_id(dataset_id).one(conn).await? {
        Some(existing) => {
            let mut model: purchase_mapping::ActiveModel = existing.into();
            model.mapping_json = Set(mapping_json);
            model.update(conn).await?;
        }
        None => {
            purchase_mapping::ActiveModel {
                dataset_id: Set(dataset_id.to_string()),
                mapping_json: Set(mapping_json),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

/// Reads the persisted expense-import mapping of a budget.
pub async fn get_expense_mapping(
    db: &DatabaseConnection,
    budget_id: &str,
) -> Result<Option<ColumnMapping>> {
    match ExpenseMapping::find_by_id(budget_id).one(db).await? {
        Some(row) => parse_mapping(&row.mapping_json).map(Some),
        None => Ok(None),
    }
}

/// Upserts the expense-import mapping of a budget.
pub async fn save_expense_mapping<C>(
    conn: &C,
    budget_id: &str,
    mapping: &ColumnMapping,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let mapping_json = serialize_mapping(mapping)?;
    match ExpenseMapping::find_by_id(budget_id).one(conn).await? {
        Some(existing) => {
            let mut model: expense_mapping::ActiveModel = existing.into();
            model.mapping_json = Set(mapping_json);
            model.update(conn).await?;
        }
        None => {
            expense_mapping::ActiveModel {
                budget_id: Set(budget_id.to_string()),
                mapping_json: Set(mapping_json),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

fn parse_mapping(mapping_json: &str) -> Result<ColumnMapping> {
    serde_json::from_str(mapping_json).map_err(|e| Error::ImportFormat {
        message: format!("stored mapping is not valid JSON: {e}"),
    })
}

fn serialize_mapping(mapping: &ColumnMapping) -> Result<String> {
    serde_json::to_string(mapping).map_err(|e| Error::ImportFormat {
        message: format!("mapping cannot be serialized: {e}"),
    })
}

fn required_column<'a>(column: Option<&'a str>, field: &str) -> Result<&'a str> {
    column
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::ImportFormat {
            message: format!("mapping must name a column for {field}"),
        })
}

/// Normalizes a category cell from common spellings; anything unknown falls
/// back to [`PurchaseCategory::Other`].
fn normalize_category(value: &str) -> PurchaseCategory {
    match value.trim().to_lowercase().as_str() {
        "fixed-cost" | "fixed_cost" | "fixed cost" | "fixed" => PurchaseCategory::FixedCost,
        "travel" | "travel-cost" | "travel_cost" | "travel cost" => PurchaseCategory::Travel,
        _ => PurchaseCategory::Other,
    }
}

/// Normalizes a status cell from common spellings; anything unknown falls
/// back to [`PurchaseStatus::Drafted`].
fn normalize_status(value: &str) -> PurchaseStatus {
    match value.trim().to_lowercase().as_str() {
        "drafted" | "draft" | "written" | "proposal" => PurchaseStatus::Drafted,
        "estimated" | "estimate" => PurchaseStatus::Estimated,
        "shopping" | "shop" | "in_progress" | "in progress" => PurchaseStatus::Shopping,
        "purchased" | "done" | "complete" | "completed" => PurchaseStatus::Purchased,
        "declined" | "skip" | "cancel" | "cancelled" | "not purchasing" | "not_purchasing" => {
            PurchaseStatus::Declined
        }
        _ => PurchaseStatus::Drafted,
    }
}

/// Normalizes a priority cell: digits are clamped into 1-5, common words
/// map onto the scale, anything else is the default 3.
fn normalize_priority(value: &str) -> i32 {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<i32>() {
        return number.clamp(1, 5);
    }
    match trimmed.to_lowercase().as_str() {
        "highest" => 5,
        "high" => 4,
        "low" => 2,
        "lowest" => 1,
        _ => 3,
    }
}

/// Parses an amount cell, accepting thousands separators.
fn parse_amount(value: &str) -> Option<f64> {
    value
        .replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Converts each row of `text` into a purchase for the dataset.
///
/// `overwrite` replaces the dataset's purchases with the batch; otherwise
/// rows are appended. Runs as one storage transaction; a failing row only
/// fails itself and is enumerated in the report. After any row imports
/// successfully the mapping is persisted for the dataset.
///
/// # Errors
/// * [`Error::ImportFormat`] when the mapping lacks the required fields or
///   the file lacks a required mapped column
/// * [`Error::UnknownDataset`] when the dataset does not exist
pub async fn import_purchases_csv(
    db: &DatabaseConnection,
    dataset_id: &str,
    text: &str,
    mapping: &ColumnMapping,
    overwrite: bool,
    default_unit: &str,
) -> Result<ImportReport> {
    let item_column = required_column(mapping.item_name.as_deref(), "item_name")?;
    let amount_column = required_column(mapping.amount.as_deref(), "amount")?;

    Dataset::find_by_id(dataset_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownDataset {
            id: dataset_id.to_string(),
        })?;

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let find_column = |name: &str| headers.iter().position(|h| h == name);

    let item_index = find_column(item_column).ok_or_else(|| Error::ImportFormat {
        message: format!("file has no column named {item_column}"),
    })?;
    let amount_index = find_column(amount_column).ok_or_else(|| Error::ImportFormat {
        message: format!("file has no column named {amount_column}"),
    })?;
    let member_index = mapping.member_name.as_deref().and_then(find_column);
    let category_index = mapping.category.as_deref().and_then(find_column);
    let priority_index = mapping.priority.as_deref().and_then(find_column);
    let note_index = mapping.note.as_deref().and_then(find_column);
    let status_index = mapping.status.as_deref().and_then(find_column);
    let budget_index = mapping.budget_id.as_deref().and_then(find_column);
    let allocation_index = mapping.allocation_amount.as_deref().and_then(find_column);

    let txn = db.begin().await?;
    if overwrite {
        clear_purchases(&txn, dataset_id).await?;
    }
    let known_budget_ids = budget_id_set(&txn, dataset_id).await?;

    let mut imported = 0usize;
    let mut failures = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let row = index + 2; // 1-based, after the header line
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                failures.push(RowFailure {
                    row,
                    reason: format!("unreadable row: {e}"),
                });
                continue;
            }
        };
        let cell = |column: Option<usize>| {
            column
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let Some(item_name) = cell(Some(item_index)) else {
            failures.push(RowFailure {
                row,
                reason: "missing item name".to_string(),
            });
            continue;
        };
        let Some(raw_amount) = cell(Some(amount_index)) else {
            failures.push(RowFailure {
                row,
                reason: "missing amount".to_string(),
            });
            continue;
        };
        let Some(amount) = parse_amount(raw_amount) else {
            failures.push(RowFailure {
                row,
                reason: format!("amount is not a number: {raw_amount}"),
            });
            continue;
        };

        // At most one allocation per row: the flat format carries one
        // (budget, amount) pair next to each purchase
        let mut allocations = Vec::new();
        if let (Some(budget_id), Some(raw_allocation)) = (cell(budget_index), cell(allocation_index))
        {
            let Some(allocation_amount) = parse_amount(raw_allocation) else {
                failures.push(RowFailure {
                    row,
                    reason: format!("allocation amount is not a number: {raw_allocation}"),
                });
                continue;
            };
            if !known_budget_ids.contains(budget_id) {
                failures.push(RowFailure {
                    row,
                    reason: format!("unknown budget: {budget_id}"),
                });
                continue;
            }
            allocations.push(AllocationInput {
                budget_id: budget_id.to_string(),
                amount: allocation_amount,
            });
        }

        let input = PurchaseInput {
            member_name: cell(member_index).map(str::to_string),
            category: cell(category_index).map_or(PurchaseCategory::Other, normalize_category),
            item_name: item_name.to_string(),
            amount,
            unit: default_unit.to_string(),
            status: cell(status_index).map_or(PurchaseStatus::Drafted, normalize_status),
            priority: cell(priority_index).map_or(3, normalize_priority),
            note: cell(note_index).map(str::to_string),
            allocations,
        };

        match insert_purchase_with_allocations(&txn, dataset_id, &input, &known_budget_ids).await {
            Ok(_) => imported += 1,
            Err(e) => failures.push(RowFailure {
                row,
                reason: e.to_string(),
            }),
        }
    }

    if imported > 0 {
        save_purchase_mapping(&txn, dataset_id, mapping).await?;
    }
    txn.commit().await?;

    info!(
        dataset = dataset_id,
        imported,
        failed = failures.len(),
        "imported purchases"
    );
    Ok(ImportReport { imported, failures })
}

/// Converts each row of `text` into an actual expense for the budget - the
/// single-column legacy path. `overwrite` replaces the budget's expenses.
/// Runs as one storage transaction; failing rows are enumerated. After any
/// row imports successfully the mapping is persisted for the budget.
pub async fn import_expenses_csv(
    db: &DatabaseConnection,
    budget_id: &str,
    text: &str,
    mapping: &ColumnMapping,
    overwrite: bool,
    default_unit: &str,
) -> Result<ImportReport> {
    let item_column = required_column(mapping.item_name.as_deref(), "item_name")?;
    let amount_column = required_column(mapping.amount.as_deref(), "amount")?;

    Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownBudget {
            id: budget_id.to_string(),
        })?;

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let find_column = |name: &str| headers.iter().position(|h| h == name);

    let item_index = find_column(item_column).ok_or_else(|| Error::ImportFormat {
        message: format!("file has no column named {item_column}"),
    })?;
    let amount_index = find_column(amount_column).ok_or_else(|| Error::ImportFormat {
        message: format!("file has no column named {amount_column}"),
    })?;

    let txn = db.begin().await?;
    if overwrite {
        ActualExpense::delete_many()
            .filter(actual_expense::Column::BudgetId.eq(budget_id))
            .exec(&txn)
            .await?;
    }

    let mut imported = 0usize;
    let mut failures = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let row = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                failures.push(RowFailure {
                    row,
                    reason: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let item_name = record.get(item_index).map(str::trim).filter(|s| !s.is_empty());
        let raw_amount = record.get(amount_index).map(str::trim).filter(|s| !s.is_empty());
        let (Some(item_name), Some(raw_amount)) = (item_name, raw_amount) else {
            failures.push(RowFailure {
                row,
                reason: "missing item name or amount".to_string(),
            });
            continue;
        };
        let Some(amount) = parse_amount(raw_amount) else {
            failures.push(RowFailure {
                row,
                reason: format!("amount is not a number: {raw_amount}"),
            });
            continue;
        };

        actual_expense::ActiveModel {
            budget_id: Set(budget_id.to_string()),
            item_name: Set(Some(item_name.to_string())),
            amount: Set(amount),
            unit: Set(default_unit.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        imported += 1;
    }

    if imported > 0 {
        save_expense_mapping(&txn, budget_id, mapping).await?;
    }
    txn.commit().await?;

    info!(
        budget = budget_id,
        imported,
        failed = failures.len(),
        "imported actual expenses"
    );
    Ok(ImportReport { imported, failures })
}
