//! Payroll cost analytics: department and position roll-ups, budget
//! variance, record search, pay-calendar bucketing and cost dispersion,
//! all derived from immutable record snapshots.

pub mod actions;
pub mod aggregate;
pub mod calendar;
pub mod cli;
pub mod dashboard;
pub mod error;
pub mod fmt;
pub mod models;
pub mod search;
pub mod settings;
pub mod source;
pub mod stats;
pub mod validation;
pub mod variance;
