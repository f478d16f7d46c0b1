//! Allocation entity - The atomic unit of split spending.
//!
//! Each row assigns part of one purchase's amount to one budget. Allocations
//! are owned exclusively by their purchase and have no independent lifecycle;
//! the sum over a purchase is allowed to differ from the purchase amount
//! (surfaced as a mismatch warning, never rejected at write time).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allocation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "allocations")]
pub struct Model {
    /// Unique identifier for the allocation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Purchase this allocation belongs to
    pub purchase_id: i64,
    /// Budget (in the same dataset) this slice is assigned to
    pub budget_id: String,
    /// Amount of the purchase assigned to the budget
    pub amount: f64,
}

/// Defines relationships between Allocation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocation belongs to one purchase
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id"
    )]
    Purchase,
    /// Each allocation references one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
