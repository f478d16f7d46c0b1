//! Expense import mapping entity - The budget-scoped column mapping for the
//! single-column legacy expense import path, stored as a JSON blob.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense import mapping database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_import_mappings")]
pub struct Model {
    /// Budget this mapping belongs to (one mapping per budget)
    #[sea_orm(primary_key, auto_increment = false)]
    pub budget_id: String,
    /// JSON-serialized [`crate::core::csv_import::ColumnMapping`]
    pub mapping_json: String,
}

/// Defines relationships between ExpenseMapping and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each mapping belongs to one budget
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
