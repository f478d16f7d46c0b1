//! Budget entity - Represents a spending envelope within a dataset.
//!
//! The id is user-assignable (or generated) and immutable once created;
//! editing a budget can change name/amount/unit/description but never its
//! identity. Derived figures (actual, planned, remaining forecast) are
//! computed by the dashboard aggregator and never stored here, so they can
//! never drift from the allocation records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Identifier, unique within a dataset; user-assignable or UUID-generated
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Dataset this budget belongs to
    pub dataset_id: String,
    /// Human-readable name of the envelope (e.g., "Groceries", "Hotel")
    pub name: String,
    /// Total envelope amount for the period
    pub total_amount: f64,
    /// Display unit label (an opaque string, not a convertible currency)
    pub unit: String,
    /// Optional free-text description
    pub description: Option<String>,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one dataset
    #[sea_orm(
        belongs_to = "super::dataset::Entity",
        from = "Column::DatasetId",
        to = "super::dataset::Column::Id"
    )]
    Dataset,
    /// One budget is referenced by many allocations
    #[sea_orm(has_many = "super::allocation::Entity")]
    Allocations,
    /// One budget has many actual expenses
    #[sea_orm(has_many = "super::actual_expense::Entity")]
    ActualExpenses,
}

impl Related<super::dataset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl Related<super::allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl Related<super::actual_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActualExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
