//! Kickoff Core
//!
//! Core types for triggering and following builds on a Jenkins-style CI server.
//!
//! This crate contains:
//! - Domain types: the job handle, trigger parameters and the terminal outcome
//! - DTOs: status payloads returned by the CI server's JSON API

pub mod domain;
pub mod dto;
