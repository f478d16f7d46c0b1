//! Actual expense entity - A realized-spend line item booked directly
//! against a budget, outside the purchase/allocation pipeline.
//!
//! Typically fed by the single-column legacy import; contributes to a
//! budget's actual total in the dashboard aggregator.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Actual expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actual_expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Budget the expense was paid from
    pub budget_id: String,
    /// Optional description of what was paid for
    pub item_name: Option<String>,
    /// Amount actually spent
    pub amount: f64,
    /// Display unit label
    pub unit: String,
}

/// Defines relationships between ActualExpense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
