//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod actual_expense;
pub mod allocation;
pub mod budget;
pub mod dataset;
pub mod expense_mapping;
pub mod member;
pub mod purchase;
pub mod purchase_mapping;

// Re-export specific types to avoid conflicts
pub use actual_expense::{
    Column as ActualExpenseColumn, Entity as ActualExpense, Model as ActualExpenseModel,
};
pub use allocation::{Column as AllocationColumn, Entity as Allocation, Model as AllocationModel};
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use dataset::{Column as DatasetColumn, Entity as Dataset, Model as DatasetModel};
pub use expense_mapping::{
    Column as ExpenseMappingColumn, Entity as ExpenseMapping, Model as ExpenseMappingModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use purchase_mapping::{
    Column as PurchaseMappingColumn, Entity as PurchaseMapping, Model as PurchaseMappingModel,
};
