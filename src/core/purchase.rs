//! Purchase business logic - Handles all purchase-related operations.
//!
//! A purchase and its allocations are written as one unit: creation and
//! update run inside a storage transaction so a failing validation leaves no
//! partial record. Reads return the purchase together with its allocations
//! and a mismatch warning flag computed by the allocation engine; the
//! mismatch is never enforced at write time.

use crate::{
    core::allocation::{AllocationInput, allocation_mismatch, validate_allocations},
    entities::{Allocation, Dataset, Purchase, allocation, purchase},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::{HashMap, HashSet};

/// Lifecycle of a purchase, a closed set with a fixed manual-advance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    /// Written down, nothing decided yet
    Drafted,
    /// Cost has been estimated
    Estimated,
    /// Actively being shopped for
    Shopping,
    /// Bought
    Purchased,
    /// Decided against buying
    Declined,
}

impl PurchaseStatus {
    /// String form stored in the ledger.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drafted => "drafted",
            Self::Estimated => "estimated",
            Self::Shopping => "shopping",
            Self::Purchased => "purchased",
            Self::Declined => "declined",
        }
    }

    /// Next status on a manual advance action. The order is cyclic
    /// (declined wraps back to drafted) so repeated advancing doubles as an
    /// undo.
    #[must_use]
    pub const fn advanced(self) -> Self {
        match self {
            Self::Drafted => Self::Estimated,
            Self::Estimated => Self::Shopping,
            Self::Shopping => Self::Purchased,
            Self::Purchased => Self::Declined,
            Self::Declined => Self::Drafted,
        }
    }

    /// Pre-commitment statuses counted as pure "plans" by the category
    /// breakdown of the dashboard.
    #[must_use]
    pub const fn is_planned(self) -> bool {
        matches!(self, Self::Drafted | Self::Estimated)
    }
}

impl TryFrom<&str> for PurchaseStatus {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "drafted" => Ok(Self::Drafted),
            "estimated" => Ok(Self::Estimated),
            "shopping" => Ok(Self::Shopping),
            "purchased" => Ok(Self::Purchased),
            "declined" => Ok(Self::Declined),
            other => Err(Error::Validation {
                message: format!("unknown status: {other}"),
            }),
        }
    }
}

/// Spending category of a purchase. A purchase's entire amount is
/// attributed to its category bucket, independent of the budget split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseCategory {
    /// Recurring, unavoidable cost
    FixedCost,
    /// Travel cost
    Travel,
    /// Everything else
    Other,
}

impl PurchaseCategory {
    /// String form stored in the ledger.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FixedCost => "fixed-cost",
            Self::Travel => "travel",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PurchaseCategory {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "fixed-cost" => Ok(Self::FixedCost),
            "travel" => Ok(Self::Travel),
            "other" => Ok(Self::Other),
            other => Err(Error::Validation {
                message: format!("unknown category: {other}"),
            }),
        }
    }
}

/// Everything needed to create a purchase, allocations included.
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    /// Free-text attribution to a person
    pub member_name: Option<String>,
    /// Spending category
    pub category: PurchaseCategory,
    /// What is being bought
    pub item_name: String,
    /// Authoritative total cost
    pub amount: f64,
    /// Display unit label
    pub unit: String,
    /// Lifecycle status
    pub status: PurchaseStatus,
    /// Priority from 1 to 5
    pub priority: i32,
    /// Optional free-text note
    pub note: Option<String>,
    /// Proposed split across budgets; may be empty (unassigned spend)
    pub allocations: Vec<AllocationInput>,
}

/// Partial update of a purchase. `None` fields are left untouched; the
/// double-`Option` fields distinguish "leave as is" from "clear the value".
/// Providing `allocations` replaces the whole split.
#[derive(Debug, Clone, Default)]
pub struct PurchaseUpdate {
    /// New member attribution (`Some(None)` clears it)
    pub member_name: Option<Option<String>>,
    /// New category
    pub category: Option<PurchaseCategory>,
    /// New item name
    pub item_name: Option<String>,
    /// New total cost
    pub amount: Option<f64>,
    /// New unit label
    pub unit: Option<String>,
    /// New status (direct set, bypassing the advance cycle)
    pub status: Option<PurchaseStatus>,
    /// New priority
    pub priority: Option<i32>,
    /// New note (`Some(None)` clears it)
    pub note: Option<Option<String>>,
    /// Replacement split across budgets
    pub allocations: Option<Vec<AllocationInput>>,
}

/// A purchase as read back from the ledger: the row, its allocations, and
/// the mismatch warning flag.
#[derive(Debug, Clone)]
pub struct PurchaseRecord {
    /// The purchase row
    pub purchase: purchase::Model,
    /// The allocations owned by the purchase
    pub allocations: Vec<allocation::Model>,
    /// True when the allocation sum disagrees with the purchase amount by
    /// more than the engine tolerance. Purchases with no allocations are
    /// "unassigned", not mismatched; the dashboard reports those separately.
    pub mismatched: bool,
}

impl PurchaseRecord {
    fn new(purchase: purchase::Model, allocations: Vec<allocation::Model>) -> Self {
        let sum: f64 = allocations.iter().map(|a| a.amount).sum();
        let mismatched = !allocations.is_empty() && allocation_mismatch(sum, purchase.amount);
        Self {
            purchase,
            allocations,
            mismatched,
        }
    }
}

fn validate_purchase_fields(
    item_name: &str,
    amount: f64,
    priority: i32,
) -> Result<()> {
    if item_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "item name cannot be empty".to_string(),
        });
    }
    if !amount.is_finite() {
        return Err(Error::Validation {
            message: format!("amount is not a finite number: {amount}"),
        });
    }
    if !(1..=5).contains(&priority) {
        return Err(Error::Validation {
            message: format!("priority must be between 1 and 5, got {priority}"),
        });
    }
    Ok(())
}

/// Inserts a purchase row plus its allocation rows on the given connection.
/// Used by [`create_purchase`] and the CSV import batch, both of which wrap
/// it in a transaction.
pub(crate) async fn insert_purchase_with_allocations<C>(
    conn: &C,
    dataset_id: &str,
    input: &PurchaseInput,
    known_budget_ids: &HashSet<String>,
) -> Result<(purchase::Model, Vec<allocation::Model>)>
where
    C: ConnectionTrait,
{
    validate_purchase_fields(&input.item_name, input.amount, input.priority)?;
    validate_allocations(&input.allocations, known_budget_ids)?;

    let purchase_model = purchase::ActiveModel {
        dataset_id: Set(dataset_id.to_string()),
        member_name: Set(input.member_name.clone()),
        category: Set(input.category.as_str().to_string()),
        item_name: Set(input.item_name.trim().to_string()),
        amount: Set(input.amount),
        unit: Set(input.unit.clone()),
        status: Set(input.status.as_str().to_string()),
        priority: Set(input.priority),
        note: Set(input.note.clone()),
        ..Default::default()
    };
    let inserted = purchase_model.insert(conn).await?;

    let mut allocations = Vec::with_capacity(input.allocations.len());
    for slice in &input.allocations {
        let row = allocation::ActiveModel {
            purchase_id: Set(inserted.id),
            budget_id: Set(slice.budget_id.clone()),
            amount: Set(slice.amount),
            ..Default::default()
        };
        allocations.push(row.insert(conn).await?);
    }

    Ok((inserted, allocations))
}

/// Creates a purchase with its allocations as one atomic unit.
///
/// # Errors
/// * [`Error::UnknownDataset`] when the dataset does not exist
/// * [`Error::UnknownBudget`] when an allocation references a budget outside
///   the dataset
/// * [`Error::Validation`] for an empty item name, non-finite amount, or
///   out-of-range priority
pub async fn create_purchase(
    db: &DatabaseConnection,
    dataset_id: &str,
    input: PurchaseInput,
) -> Result<PurchaseRecord> {
    validate_purchase_fields(&input.item_name, input.amount, input.priority)?;

    Dataset::find_by_id(dataset_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownDataset {
            id: dataset_id.to_string(),
        })?;

    let txn = db.begin().await?;
    let known_budget_ids = crate::core::budget::budget_id_set(&txn, dataset_id).await?;
    let (purchase, allocations) =
        insert_purchase_with_allocations(&txn, dataset_id, &input, &known_budget_ids).await?;
    txn.commit().await?;

    Ok(PurchaseRecord::new(purchase, allocations))
}

/// Retrieves one purchase with its allocations and mismatch flag.
pub async fn get_purchase(db: &DatabaseConnection, purchase_id: i64) -> Result<PurchaseRecord> {
    let purchase = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownPurchase { id: purchase_id })?;

    let allocations = Allocation::find()
        .filter(allocation::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(allocation::Column::Id)
        .all(db)
        .await?;

    Ok(PurchaseRecord::new(purchase, allocations))
}

/// Lists all purchases of a dataset with their allocations and mismatch
/// flags, in creation order.
pub async fn list_purchases(
    db: &DatabaseConnection,
    dataset_id: &str,
) -> Result<Vec<PurchaseRecord>> {
    let purchases = Purchase::find()
        .filter(purchase::Column::DatasetId.eq(dataset_id))
        .order_by_asc(purchase::Column::Id)
        .all(db)
        .await?;

    let purchase_ids: Vec<i64> = purchases.iter().map(|p| p.id).collect();
    let mut grouped: HashMap<i64, Vec<allocation::Model>> = HashMap::new();
    if !purchase_ids.is_empty() {
        let allocations = Allocation::find()
            .filter(allocation::Column::PurchaseId.is_in(purchase_ids))
            .order_by_asc(allocation::Column::Id)
            .all(db)
            .await?;
        for row in allocations {
            grouped.entry(row.purchase_id).or_default().push(row);
        }
    }

    Ok(purchases
        .into_iter()
        .map(|p| {
            let allocations = grouped.remove(&p.id).unwrap_or_default();
            PurchaseRecord::new(p, allocations)
        })
        .collect())
}

/// Applies a partial update; when `allocations` is provided the existing
/// split is replaced wholesale, validated against the dataset's budgets.
/// The purchase row and its allocations change as one atomic unit.
pub async fn update_purchase(
    db: &DatabaseConnection,
    purchase_id: i64,
    update: PurchaseUpdate,
) -> Result<PurchaseRecord> {
    let purchase = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownPurchase { id: purchase_id })?;

    let item_name = update.item_name.as_deref().unwrap_or(&purchase.item_name);
    let amount = update.amount.unwrap_or(purchase.amount);
    let priority = update.priority.unwrap_or(purchase.priority);
    validate_purchase_fields(item_name, amount, priority)?;

    let txn = db.begin().await?;

    let mut model: purchase::ActiveModel = purchase.clone().into();
    if let Some(member_name) = update.member_name {
        model.member_name = Set(member_name);
    }
    if let Some(category) = update.category {
        model.category = Set(category.as_str().to_string());
    }
    if let Some(item_name) = update.item_name {
        model.item_name = Set(item_name.trim().to_string());
    }
    if let Some(amount) = update.amount {
        model.amount = Set(amount);
    }
    if let Some(unit) = update.unit {
        model.unit = Set(unit);
    }
    if let Some(status) = update.status {
        model.status = Set(status.as_str().to_string());
    }
    if let Some(priority) = update.priority {
        model.priority = Set(priority);
    }
    if let Some(note) = update.note {
        model.note = Set(note);
    }
    // An allocations-only update leaves the purchase row untouched
    if model.is_changed() {
        model.update(&txn).await?;
    }

    if let Some(allocations) = update.allocations {
        let known_budget_ids =
            crate::core::budget::budget_id_set(&txn, &purchase.dataset_id).await?;
        validate_allocations(&allocations, &known_budget_ids)?;

        Allocation::delete_many()
            .filter(allocation::Column::PurchaseId.eq(purchase_id))
            .exec(&txn)
            .await?;
        for slice in &allocations {
            allocation::ActiveModel {
                purchase_id: Set(purchase_id),
                budget_id: Set(slice.budget_id.clone()),
                amount: Set(slice.amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    get_purchase(db, purchase_id).await
}

/// Sets a purchase's status directly (explicit edit).
pub async fn set_purchase_status(
    db: &DatabaseConnection,
    purchase_id: i64,
    status: PurchaseStatus,
) -> Result<purchase::Model> {
    let purchase = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownPurchase { id: purchase_id })?;

    let mut model: purchase::ActiveModel = purchase.into();
    model.status = Set(status.as_str().to_string());
    model.update(db).await.map_err(Into::into)
}

/// Moves a purchase one step along the status cycle
/// (drafted → estimated → shopping → purchased → declined → drafted).
/// An unparseable stored status is treated as drafted before advancing.
pub async fn advance_purchase_status(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<purchase::Model> {
    let purchase = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownPurchase { id: purchase_id })?;

    let current =
        PurchaseStatus::try_from(purchase.status.as_str()).unwrap_or(PurchaseStatus::Drafted);
    let mut model: purchase::ActiveModel = purchase.into();
    model.status = Set(current.advanced().as_str().to_string());
    model.update(db).await.map_err(Into::into)
}

/// Deletes a purchase together with its allocations.
pub async fn delete_purchase(db: &DatabaseConnection, purchase_id: i64) -> Result<()> {
    let purchase = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownPurchase { id: purchase_id })?;

    let txn = db.begin().await?;
    Allocation::delete_many()
        .filter(allocation::Column::PurchaseId.eq(purchase_id))
        .exec(&txn)
        .await?;
    purchase.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Removes every purchase (and allocation) of a dataset on the given
/// connection. Used by the overwrite import path inside its batch
/// transaction.
pub(crate) async fn clear_purchases<C>(conn: &C, dataset_id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let purchase_ids: Vec<i64> = Purchase::find()
        .filter(purchase::Column::DatasetId.eq(dataset_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    if !purchase_ids.is_empty() {
        Allocation::delete_many()
            .filter(allocation::Column::PurchaseId.is_in(purchase_ids))
            .exec(conn)
            .await?;
        Purchase::delete_many()
            .filter(purchase::Column::DatasetId.eq(dataset_id))
            .exec(conn)
            .await?;
    }

    Ok(())
}

/// Removes every purchase of a dataset as one atomic unit.
pub async fn clear_all_purchases(db: &DatabaseConnection, dataset_id: &str) -> Result<()> {
    let txn = db.begin().await?;
    clear_purchases(&txn, dataset_id).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_status_advance_cycle_wraps() {
        let mut status = PurchaseStatus::Drafted;
        let expected = [
            PurchaseStatus::Estimated,
            PurchaseStatus::Shopping,
            PurchaseStatus::Purchased,
            PurchaseStatus::Declined,
            PurchaseStatus::Drafted,
        ];
        for want in expected {
            status = status.advanced();
            assert_eq!(status, want);
        }
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            PurchaseStatus::Drafted,
            PurchaseStatus::Estimated,
            PurchaseStatus::Shopping,
            PurchaseStatus::Purchased,
            PurchaseStatus::Declined,
        ] {
            assert_eq!(PurchaseStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(PurchaseStatus::try_from("on hold").is_err());
    }

    #[test]
    fn test_category_string_round_trip() {
        for category in [
            PurchaseCategory::FixedCost,
            PurchaseCategory::Travel,
            PurchaseCategory::Other,
        ] {
            assert_eq!(
                PurchaseCategory::try_from(category.as_str()).unwrap(),
                category
            );
        }
        assert!(PurchaseCategory::try_from("misc").is_err());
    }

    #[tokio::test]
    async fn test_create_purchase_with_allocations() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        let budget_a = create_test_budget(&db, &dataset.id, "budget-a", 10000.0).await?;
        let budget_b = create_test_budget(&db, &dataset.id, "budget-b", 5000.0).await?;

        let record = create_purchase(
            &db,
            &dataset.id,
            purchase_input(
                "Tent",
                3000.0,
                &[(&budget_a.id, 1000.0), (&budget_b.id, 2000.0)],
            ),
        )
        .await?;

        assert_eq!(record.purchase.item_name, "Tent");
        assert_eq!(record.allocations.len(), 2);
        assert!(!record.mismatched);

        // Rows are really in the store
        let stored = get_purchase(&db, record.purchase.id).await?;
        assert_eq!(stored.allocations.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_purchase_unknown_budget_leaves_no_partial_record() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        create_test_budget(&db, &dataset.id, "budget-a", 10000.0).await?;

        let result = create_purchase(
            &db,
            &dataset.id,
            purchase_input("Tent", 3000.0, &[("ghost", 3000.0)]),
        )
        .await;
        assert!(matches!(result, Err(Error::UnknownBudget { id }) if id == "ghost"));

        // All-or-nothing: the purchase row must not have been kept
        assert!(list_purchases(&db, &dataset.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_purchase_validation() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;

        let result =
            create_purchase(&db, &dataset.id, purchase_input("   ", 100.0, &[])).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        let result =
            create_purchase(&db, &dataset.id, purchase_input("Tent", f64::NAN, &[])).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        let mut input = purchase_input("Tent", 100.0, &[]);
        input.priority = 0;
        let result = create_purchase(&db, &dataset.id, input).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_purchase_unknown_dataset() -> Result<()> {
        let db = setup_test_db().await?;
        let result =
            create_purchase(&db, "no-such-dataset", purchase_input("Tent", 100.0, &[])).await;
        assert!(matches!(result, Err(Error::UnknownDataset { id: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_flags_partial_split_as_mismatched() -> Result<()> {
        let (db, dataset, budget) = setup_with_budget().await?;

        create_test_purchase(&db, &dataset.id, "Partial", 100.0, &[(&budget.id, 40.0)]).await?;
        create_test_purchase(&db, &dataset.id, "Unassigned", 50.0, &[]).await?;
        create_test_purchase(&db, &dataset.id, "Exact", 60.0, &[(&budget.id, 60.0)]).await?;

        let records = list_purchases(&db, &dataset.id).await?;
        assert_eq!(records.len(), 3);
        assert!(records[0].mismatched);
        // No allocations means unassigned, not mismatched
        assert!(!records[1].mismatched);
        assert!(!records[2].mismatched);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_purchase_replaces_allocations() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        let budget_a = create_test_budget(&db, &dataset.id, "budget-a", 10000.0).await?;
        let budget_b = create_test_budget(&db, &dataset.id, "budget-b", 5000.0).await?;

        let record = create_test_purchase(
            &db,
            &dataset.id,
            "Tent",
            3000.0,
            &[(&budget_a.id, 3000.0)],
        )
        .await?;

        let updated = update_purchase(
            &db,
            record.purchase.id,
            PurchaseUpdate {
                amount: Some(4000.0),
                allocations: Some(vec![
                    AllocationInput {
                        budget_id: budget_a.id.clone(),
                        amount: 1000.0,
                    },
                    AllocationInput {
                        budget_id: budget_b.id.clone(),
                        amount: 3000.0,
                    },
                ]),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.purchase.amount, 4000.0);
        assert_eq!(updated.allocations.len(), 2);
        assert!(!updated.mismatched);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_purchase_clears_member_name() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        let mut input = purchase_input("Tent", 100.0, &[]);
        input.member_name = Some("Alice".to_string());
        let record = create_purchase(&db, &dataset.id, input).await?;
        assert_eq!(record.purchase.member_name.as_deref(), Some("Alice"));

        let updated = update_purchase(
            &db,
            record.purchase.id,
            PurchaseUpdate {
                member_name: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert!(updated.purchase.member_name.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_advance_and_set_status() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        let record = create_test_purchase(&db, &dataset.id, "Tent", 100.0, &[]).await?;
        let id = record.purchase.id;

        let advanced = advance_purchase_status(&db, id).await?;
        assert_eq!(advanced.status, "estimated");

        // Direct set jumps anywhere in the cycle
        let set = set_purchase_status(&db, id, PurchaseStatus::Declined).await?;
        assert_eq!(set.status, "declined");

        // Advancing from declined wraps back to drafted
        let wrapped = advance_purchase_status(&db, id).await?;
        assert_eq!(wrapped.status, "drafted");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_purchase_removes_allocations() -> Result<()> {
        let (db, dataset, budget) = setup_with_budget().await?;
        let record =
            create_test_purchase(&db, &dataset.id, "Tent", 100.0, &[(&budget.id, 100.0)]).await?;

        delete_purchase(&db, record.purchase.id).await?;

        assert!(list_purchases(&db, &dataset.id).await?.is_empty());
        let orphans = Allocation::find()
            .filter(allocation::Column::PurchaseId.eq(record.purchase.id))
            .all(&db)
            .await?;
        assert!(orphans.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_all_purchases_scoped_to_dataset() -> Result<()> {
        let db = setup_test_db().await?;
        let dataset_a = create_test_dataset(&db, "A").await?;
        let dataset_b = create_test_dataset(&db, "B").await?;
        create_test_purchase(&db, &dataset_a.id, "One", 10.0, &[]).await?;
        create_test_purchase(&db, &dataset_a.id, "Two", 20.0, &[]).await?;
        create_test_purchase(&db, &dataset_b.id, "Keep", 30.0, &[]).await?;

        clear_all_purchases(&db, &dataset_a.id).await?;

        assert!(list_purchases(&db, &dataset_a.id).await?.is_empty());
        assert_eq!(list_purchases(&db, &dataset_b.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_purchase() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_purchase(&db, 999).await;
        assert!(matches!(result, Err(Error::UnknownPurchase { id: 999 })));
        Ok(())
    }
}
