//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`,
//! `chrono`). Keep it lean: no I/O and no rule evaluation, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod course;
pub mod identity;
pub mod outcome;
pub mod records;
pub mod registry;
