//! Actual expense business logic.
//!
//! Actual expenses are realized spend booked directly against a budget,
//! independent of the purchase/allocation pipeline - typically fed by the
//! legacy single-column import. They drive a budget's actual total in the
//! dashboard aggregator.

use crate::{
    entities::{ActualExpense, Budget, actual_expense},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};

/// Everything needed to book an actual expense.
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    /// Optional description of what was paid for
    pub item_name: Option<String>,
    /// Amount actually spent
    pub amount: f64,
    /// Display unit label
    pub unit: String,
}

fn validate_expense_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::Validation {
            message: format!("amount is not a finite number: {amount}"),
        });
    }
    Ok(())
}

/// Books an actual expense against a budget.
pub async fn create_actual_expense(
    db: &DatabaseConnection,
    budget_id: &str,
    input: ExpenseInput,
) -> Result<actual_expense::Model> {
    validate_expense_amount(input.amount)?;
    Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownBudget {
            id: budget_id.to_string(),
        })?;

    let model = actual_expense::ActiveModel {
        budget_id: Set(budget_id.to_string()),
        item_name: Set(input.item_name),
        amount: Set(input.amount),
        unit: Set(input.unit),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Lists the actual expenses of a budget in booking order.
pub async fn list_actual_expenses(
    db: &DatabaseConnection,
    budget_id: &str,
) -> Result<Vec<actual_expense::Model>> {
    ActualExpense::find()
        .filter(actual_expense::Column::BudgetId.eq(budget_id))
        .order_by_asc(actual_expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the fields of an existing expense.
pub async fn update_actual_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    input: ExpenseInput,
) -> Result<actual_expense::Model> {
    validate_expense_amount(input.amount)?;
    let existing = ActualExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownExpense { id: expense_id })?;

    let mut model: actual_expense::ActiveModel = existing.into();
    model.item_name = Set(input.item_name);
    model.amount = Set(input.amount);
    model.unit = Set(input.unit);
    model.update(db).await.map_err(Into::into)
}

/// Removes an actual expense.
pub async fn delete_actual_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let existing = ActualExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownExpense { id: expense_id })?;
    existing.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_list_expenses() -> Result<()> {
        let (db, _dataset, budget) = setup_with_budget().await?;

        create_actual_expense(
            &db,
            &budget.id,
            ExpenseInput {
                item_name: Some("Supermarket".to_string()),
                amount: 42.5,
                unit: "USD".to_string(),
            },
        )
        .await?;
        create_test_expense(&db, &budget.id, 10.0).await?;

        let expenses = list_actual_expenses(&db, &budget.id).await?;
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].item_name.as_deref(), Some("Supermarket"));
        assert_eq!(expenses[0].amount, 42.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_unknown_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_actual_expense(
            &db,
            "ghost",
            ExpenseInput {
                item_name: None,
                amount: 1.0,
                unit: "USD".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::UnknownBudget { id: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_rejects_non_finite_amount() -> Result<()> {
        let (db, _dataset, budget) = setup_with_budget().await?;
        let result = create_actual_expense(
            &db,
            &budget.id,
            ExpenseInput {
                item_name: None,
                amount: f64::INFINITY,
                unit: "USD".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_expense() -> Result<()> {
        let (db, _dataset, budget) = setup_with_budget().await?;
        let expense = create_test_expense(&db, &budget.id, 10.0).await?;

        let updated = update_actual_expense(
            &db,
            expense.id,
            ExpenseInput {
                item_name: Some("Corrected".to_string()),
                amount: 12.0,
                unit: "USD".to_string(),
            },
        )
        .await?;
        assert_eq!(updated.id, expense.id);
        assert_eq!(updated.amount, 12.0);
        assert_eq!(updated.item_name.as_deref(), Some("Corrected"));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense() -> Result<()> {
        let (db, _dataset, budget) = setup_with_budget().await?;
        let expense = create_test_expense(&db, &budget.id, 10.0).await?;

        delete_actual_expense(&db, expense.id).await?;
        assert!(list_actual_expenses(&db, &budget.id).await?.is_empty());

        let result = delete_actual_expense(&db, expense.id).await;
        assert!(matches!(result, Err(Error::UnknownExpense { id: _ })));
        Ok(())
    }
}
