//! Categories of income and expense.
//!
//! Categories are seeded outside of the application and are read-only to it.
//! This module contains:
//! - The `Category` model and its movement kind
//! - Database functions for creating the table and looking categories up
//! - The endpoint listing category names for the add-transaction form

mod core;
mod list_endpoint;

pub use core::{
    Category, CategoryKind, DEFAULT_CATEGORIES, create_category, create_category_table,
    get_category_by_name, get_category_names,
};
pub use list_endpoint::get_categories_endpoint;
