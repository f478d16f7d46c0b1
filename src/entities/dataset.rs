//! Dataset entity - Represents a bounded accounting period (a month, a trip).
//!
//! A dataset is the ownership root: budgets, members, purchases, and the
//! dataset-scoped import mapping all belong to exactly one dataset and are
//! removed with it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dataset database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    /// Opaque string identifier (UUID v4 in string form)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Human-readable name of the accounting period (e.g., "March", "Kyoto trip")
    pub name: String,
    /// When the dataset was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Dataset and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One dataset has many budgets
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
    /// One dataset has many members
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
    /// One dataset has many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
