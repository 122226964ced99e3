//! Core domain types
//!
//! These types describe one triggered unit of work from the moment the CI
//! server accepts it until the poll loop reaches a terminal outcome.

pub mod handle;
pub mod outcome;
pub mod parameters;
