//! Monthly aggregation over the ledger.
//!
//! - [balance]: income, expense and balance for a month
//! - [movements]: the movements of a month shown by the list views
//! - [breakdown]: expense totals per category for the chart report

mod balance;
mod breakdown;
mod movements;

pub use balance::get_balance_endpoint;
pub use breakdown::category_breakdown;
pub use movements::get_movements_endpoint;
