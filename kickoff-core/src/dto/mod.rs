//! Data Transfer Objects
//!
//! Payloads returned by the CI server's `api/json` endpoints. Only the fields
//! the poll loop inspects are modelled; everything else is ignored.

pub mod build;
pub mod queue;
