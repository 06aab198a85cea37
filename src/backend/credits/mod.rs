//! Credits Module
//!
//! Usage-metered credits for AI actions. Plans, balances and the
//! transaction ledger live in the main database; this service only reads
//! plans and records consumption.
//!
//! - **`types`** - Costs, plan rows and status payloads
//! - **`ledger`** - Plan reads and transactional consumption

pub mod ledger;
pub mod types;

pub use ledger::{check_plan_permission, check_user_credit_status, consume_credits, has_credits};
pub use types::{
    ConsumeResult, CreditAction, CreditState, CreditStatus, PlanPermission, PAGE_CREATION_COST,
    PAGE_EDIT_COST, TEMPLATE_IMPORT_COST,
};
