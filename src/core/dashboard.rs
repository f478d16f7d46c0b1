//! Dashboard aggregator - derived figures for one dataset.
//!
//! Everything here is recomputed from scratch on every call. The derived
//! figures depend on three independently mutable record kinds (budgets,
//! purchases with their allocations, actual expenses); persisting them
//! would demand invalidation on every write path and risk silent staleness,
//! which is worse than recomputation cost at household-scale volumes. The
//! arithmetic lives in [`summarize`], a pure function over loaded rows, so
//! it is unit-testable without a database.

use crate::{
    core::purchase::{PurchaseCategory, PurchaseStatus},
    entities::{
        ActualExpense, Allocation, Budget, Dataset, Purchase, actual_expense, allocation, budget,
        purchase,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, prelude::*};
use std::collections::{HashMap, HashSet};

/// Derived figures for one budget envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    /// Budget id
    pub budget_id: String,
    /// Budget name
    pub name: String,
    /// Total envelope amount
    pub total_amount: f64,
    /// Realized spend: sum of the budget's actual expenses
    pub actual_total: f64,
    /// Intended spend: sum of allocations across all purchases, regardless
    /// of purchase status
    pub planned_total: f64,
    /// `total_amount - actual_total - planned_total`
    pub remaining_forecast: f64,
    /// Display unit label
    pub unit: String,
    /// Budget description
    pub description: Option<String>,
}

/// The dataset-wide dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Sum of all budgets' actual totals
    pub overall_actual_total: f64,
    /// Sum of all budgets' planned totals
    pub overall_planned_total: f64,
    /// Sum of all budgets' remaining forecasts
    pub overall_remaining_forecast: f64,
    /// Sum of purchase amounts for purchases with no allocations at all -
    /// money intended to be spent but assigned to no envelope yet
    pub unassigned_planned_total: f64,
    /// Fixed-cost purchases, all statuses except declined
    pub fixed_cost_total: f64,
    /// Fixed-cost purchases still in the pre-commitment statuses
    pub fixed_cost_planned_total: f64,
    /// Travel purchases still in the pre-commitment statuses
    pub travel_planned_total: f64,
    /// Travel purchases, all statuses except declined
    pub travel_cost_total: f64,
    /// Other-category purchases still in the pre-commitment statuses
    pub other_planned_total: f64,
    /// Per-budget breakdown
    pub budgets: Vec<BudgetSummary>,
    /// Travel purchases (excluding declined) for drill-down display
    pub travel_items: Vec<purchase::Model>,
}

fn status_of(purchase: &purchase::Model) -> PurchaseStatus {
    PurchaseStatus::try_from(purchase.status.as_str()).unwrap_or(PurchaseStatus::Drafted)
}

fn category_of(purchase: &purchase::Model) -> PurchaseCategory {
    PurchaseCategory::try_from(purchase.category.as_str()).unwrap_or(PurchaseCategory::Other)
}

/// Computes the dashboard from already-loaded rows.
///
/// A purchase's category attributes its ENTIRE amount to one bucket even
/// when the purchase is split across several budgets; the per-budget
/// planned totals, by contrast, follow the allocation rows.
#[must_use]
pub fn summarize(
    budgets: &[budget::Model],
    purchases: &[purchase::Model],
    allocations: &[allocation::Model],
    expenses: &[actual_expense::Model],
) -> DashboardSummary {
    let mut actual_by_budget: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *actual_by_budget.entry(expense.budget_id.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut planned_by_budget: HashMap<&str, f64> = HashMap::new();
    let mut allocated_purchase_ids: HashSet<i64> = HashSet::new();
    for allocation in allocations {
        *planned_by_budget.entry(allocation.budget_id.as_str()).or_insert(0.0) +=
            allocation.amount;
        allocated_purchase_ids.insert(allocation.purchase_id);
    }

    let budget_summaries: Vec<BudgetSummary> = budgets
        .iter()
        .map(|b| {
            let actual_total = actual_by_budget.get(b.id.as_str()).copied().unwrap_or(0.0);
            let planned_total = planned_by_budget.get(b.id.as_str()).copied().unwrap_or(0.0);
            BudgetSummary {
                budget_id: b.id.clone(),
                name: b.name.clone(),
                total_amount: b.total_amount,
                actual_total,
                planned_total,
                remaining_forecast: b.total_amount - actual_total - planned_total,
                unit: b.unit.clone(),
                description: b.description.clone(),
            }
        })
        .collect();

    let overall_actual_total: f64 = budget_summaries.iter().map(|b| b.actual_total).sum();
    let overall_planned_total: f64 = budget_summaries.iter().map(|b| b.planned_total).sum();
    let overall_remaining_forecast: f64 =
        budget_summaries.iter().map(|b| b.remaining_forecast).sum();

    // Unassigned spend is a distinct, flagged risk: purchases with no
    // allocations at all, independent of status and category
    let unassigned_planned_total: f64 = purchases
        .iter()
        .filter(|p| !allocated_purchase_ids.contains(&p.id))
        .map(|p| p.amount)
        .sum();

    let mut fixed_cost_total = 0.0;
    let mut fixed_cost_planned_total = 0.0;
    let mut travel_planned_total = 0.0;
    let mut travel_cost_total = 0.0;
    let mut other_planned_total = 0.0;
    let mut travel_items = Vec::new();

    for purchase in purchases {
        let status = status_of(purchase);
        let category = category_of(purchase);

        if status.is_planned() {
            match category {
                PurchaseCategory::FixedCost => fixed_cost_planned_total += purchase.amount,
                PurchaseCategory::Travel => travel_planned_total += purchase.amount,
                PurchaseCategory::Other => other_planned_total += purchase.amount,
            }
        }

        if status != PurchaseStatus::Declined {
            match category {
                PurchaseCategory::FixedCost => fixed_cost_total += purchase.amount,
                PurchaseCategory::Travel => {
                    travel_cost_total += purchase.amount;
                    travel_items.push(purchase.clone());
                }
                PurchaseCategory::Other => {}
            }
        }
    }

    DashboardSummary {
        overall_actual_total,
        overall_planned_total,
        overall_remaining_forecast,
        unassigned_planned_total,
        fixed_cost_total,
        fixed_cost_planned_total,
        travel_planned_total,
        travel_cost_total,
        other_planned_total,
        budgets: budget_summaries,
        travel_items,
    }
}

/// Loads one dataset's rows and computes the dashboard. Read-only and
/// side-effect free; safe to call concurrently with itself.
pub async fn dashboard_summary(
    db: &DatabaseConnection,
    dataset_id: &str,
) -> Result<DashboardSummary> {
    Dataset::find_by_id(dataset_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownDataset {
            id: dataset_id.to_string(),
        })?;

    let budgets = Budget::find()
        .filter(budget::Column::DatasetId.eq(dataset_id))
        .all(db)
        .await?;
    let purchases = Purchase::find()
        .filter(purchase::Column::DatasetId.eq(dataset_id))
        .all(db)
        .await?;

    let purchase_ids: Vec<i64> = purchases.iter().map(|p| p.id).collect();
    let allocations = if purchase_ids.is_empty() {
        Vec::new()
    } else {
        Allocation::find()
            .filter(allocation::Column::PurchaseId.is_in(purchase_ids))
            .all(db)
            .await?
    };

    let budget_ids: Vec<String> = budgets.iter().map(|b| b.id.clone()).collect();
    let expenses = if budget_ids.is_empty() {
        Vec::new()
    } else {
        ActualExpense::find()
            .filter(actual_expense::Column::BudgetId.is_in(budget_ids))
            .all(db)
            .await?
    };

    Ok(summarize(&budgets, &purchases, &allocations, &expenses))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::purchase::{PurchaseStatus, list_purchases, set_purchase_status};
    use crate::test_utils::*;

    fn budget_row(id: &str, total_amount: f64) -> budget::Model {
        budget::Model {
            id: id.to_string(),
            dataset_id: "ds".to_string(),
            name: id.to_string(),
            total_amount,
            unit: "USD".to_string(),
            description: None,
        }
    }

    fn purchase_row(id: i64, category: &str, status: &str, amount: f64) -> purchase::Model {
        purchase::Model {
            id,
            dataset_id: "ds".to_string(),
            member_name: None,
            category: category.to_string(),
            item_name: format!("item-{id}"),
            amount,
            unit: "USD".to_string(),
            status: status.to_string(),
            priority: 3,
            note: None,
        }
    }

    fn allocation_row(id: i64, purchase_id: i64, budget_id: &str, amount: f64) -> allocation::Model {
        allocation::Model {
            id,
            purchase_id,
            budget_id: budget_id.to_string(),
            amount,
        }
    }

    fn expense_row(id: i64, budget_id: &str, amount: f64) -> actual_expense::Model {
        actual_expense::Model {
            id,
            budget_id: budget_id.to_string(),
            item_name: None,
            amount,
            unit: "USD".to_string(),
        }
    }

    #[test]
    fn test_planned_total_ignores_purchase_status() {
        let budgets = vec![budget_row("a", 1000.0)];
        // Same allocation shape under every status
        let purchases = vec![
            purchase_row(1, "other", "drafted", 100.0),
            purchase_row(2, "other", "purchased", 200.0),
            purchase_row(3, "other", "declined", 300.0),
        ];
        let allocations = vec![
            allocation_row(1, 1, "a", 100.0),
            allocation_row(2, 2, "a", 200.0),
            allocation_row(3, 3, "a", 300.0),
        ];

        let summary = summarize(&budgets, &purchases, &allocations, &[]);
        assert_eq!(summary.budgets[0].planned_total, 600.0);
        assert_eq!(summary.budgets[0].remaining_forecast, 400.0);
    }

    #[test]
    fn test_remaining_forecast_arithmetic() {
        let budgets = vec![budget_row("a", 1000.0)];
        let purchases = vec![purchase_row(1, "other", "drafted", 250.0)];
        let allocations = vec![allocation_row(1, 1, "a", 250.0)];
        let expenses = vec![expense_row(1, "a", 100.0)];

        let summary = summarize(&budgets, &purchases, &allocations, &expenses);
        let b = &summary.budgets[0];
        assert_eq!(b.actual_total, 100.0);
        assert_eq!(b.planned_total, 250.0);
        assert_eq!(b.remaining_forecast, 1000.0 - 100.0 - 250.0);

        assert_eq!(summary.overall_actual_total, 100.0);
        assert_eq!(summary.overall_planned_total, 250.0);
        assert_eq!(summary.overall_remaining_forecast, 650.0);
    }

    #[test]
    fn test_unassigned_counts_only_zero_allocation_purchases() {
        let budgets = vec![budget_row("a", 1000.0)];
        let purchases = vec![
            // Unassigned under every status and category
            purchase_row(1, "travel", "drafted", 50.0),
            purchase_row(2, "fixed-cost", "purchased", 70.0),
            purchase_row(3, "other", "declined", 30.0),
            // Assigned, even partially, is not unassigned
            purchase_row(4, "other", "drafted", 500.0),
        ];
        let allocations = vec![allocation_row(1, 4, "a", 100.0)];

        let summary = summarize(&budgets, &purchases, &allocations, &[]);
        assert_eq!(summary.unassigned_planned_total, 150.0);
    }

    #[test]
    fn test_category_buckets_attribute_whole_amount_despite_split() {
        let budgets = vec![budget_row("a", 1000.0), budget_row("b", 1000.0)];
        // One travel purchase split across two budgets
        let purchases = vec![purchase_row(1, "travel", "estimated", 300.0)];
        let allocations = vec![
            allocation_row(1, 1, "a", 100.0),
            allocation_row(2, 1, "b", 200.0),
        ];

        let summary = summarize(&budgets, &purchases, &allocations, &[]);
        // The split shows up per budget...
        assert_eq!(summary.budgets[0].planned_total, 100.0);
        assert_eq!(summary.budgets[1].planned_total, 200.0);
        // ...but the category bucket carries the entire amount once
        assert_eq!(summary.travel_planned_total, 300.0);
        assert_eq!(summary.travel_cost_total, 300.0);
        assert_eq!(summary.travel_items.len(), 1);
    }

    #[test]
    fn test_category_status_filters() {
        let purchases = vec![
            purchase_row(1, "fixed-cost", "drafted", 100.0),
            purchase_row(2, "fixed-cost", "purchased", 200.0),
            purchase_row(3, "fixed-cost", "declined", 400.0),
            purchase_row(4, "travel", "estimated", 50.0),
            purchase_row(5, "travel", "shopping", 60.0),
            purchase_row(6, "travel", "declined", 70.0),
            purchase_row(7, "other", "drafted", 10.0),
            purchase_row(8, "other", "purchased", 20.0),
        ];

        let summary = summarize(&[], &purchases, &[], &[]);
        // Planned buckets: pre-commitment statuses only
        assert_eq!(summary.fixed_cost_planned_total, 100.0);
        assert_eq!(summary.travel_planned_total, 50.0);
        assert_eq!(summary.other_planned_total, 10.0);
        // Cost buckets: everything except declined
        assert_eq!(summary.fixed_cost_total, 300.0);
        assert_eq!(summary.travel_cost_total, 110.0);
        // Declined travel never shows in the drill-down
        assert_eq!(summary.travel_items.len(), 2);
    }

    #[test]
    fn test_empty_dataset_summary_is_all_zero() {
        let summary = summarize(&[], &[], &[], &[]);
        assert_eq!(summary.overall_actual_total, 0.0);
        assert_eq!(summary.overall_planned_total, 0.0);
        assert_eq!(summary.overall_remaining_forecast, 0.0);
        assert_eq!(summary.unassigned_planned_total, 0.0);
        assert!(summary.budgets.is_empty());
        assert!(summary.travel_items.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_summary_unknown_dataset() -> Result<()> {
        let db = setup_test_db().await?;
        let result = dashboard_summary(&db, "ghost").await;
        assert!(matches!(result, Err(Error::UnknownDataset { id: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_integration_with_store() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        let budget_a = create_test_budget(&db, &dataset.id, "budget-a", 10000.0).await?;
        let budget_b = create_test_budget(&db, &dataset.id, "budget-b", 5000.0).await?;

        create_test_purchase(
            &db,
            &dataset.id,
            "Tent",
            3000.0,
            &[(&budget_a.id, 1000.0), (&budget_b.id, 2000.0)],
        )
        .await?;
        create_test_purchase(&db, &dataset.id, "Souvenirs", 800.0, &[]).await?;
        create_test_expense(&db, &budget_a.id, 1500.0).await?;

        let summary = dashboard_summary(&db, &dataset.id).await?;
        let a = summary
            .budgets
            .iter()
            .find(|b| b.budget_id == budget_a.id)
            .unwrap();
        assert_eq!(a.actual_total, 1500.0);
        assert_eq!(a.planned_total, 1000.0);
        assert_eq!(a.remaining_forecast, 7500.0);

        assert_eq!(summary.overall_actual_total, 1500.0);
        assert_eq!(summary.overall_planned_total, 3000.0);
        assert_eq!(summary.unassigned_planned_total, 800.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_unassigned_total_survives_status_changes() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        create_test_budget(&db, &dataset.id, "budget-a", 1000.0).await?;
        let record = create_test_purchase(&db, &dataset.id, "Loose", 120.0, &[]).await?;

        set_purchase_status(&db, record.purchase.id, PurchaseStatus::Purchased).await?;

        let summary = dashboard_summary(&db, &dataset.id).await?;
        assert_eq!(summary.unassigned_planned_total, 120.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_after_budget_delete_reports_survivors() -> Result<()> {
        let (db, dataset) = setup_with_dataset().await?;
        let budget_a = create_test_budget(&db, &dataset.id, "budget-a", 10000.0).await?;
        let budget_b = create_test_budget(&db, &dataset.id, "budget-b", 5000.0).await?;
        create_test_purchase(
            &db,
            &dataset.id,
            "Tent",
            3000.0,
            &[(&budget_a.id, 1000.0), (&budget_b.id, 2000.0)],
        )
        .await?;

        crate::core::budget::delete_budget(&db, &budget_a.id).await?;

        // Must not fail, and must report the surviving allocation
        let summary = dashboard_summary(&db, &dataset.id).await?;
        assert_eq!(summary.budgets.len(), 1);
        assert_eq!(summary.budgets[0].budget_id, budget_b.id);
        assert_eq!(summary.budgets[0].planned_total, 2000.0);

        // The purchase now reads as mismatched against its effective split
        let records = list_purchases(&db, &dataset.id).await?;
        assert!(records[0].mismatched);
        Ok(())
    }
}
