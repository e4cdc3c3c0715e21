//! Core domain types and logic.

pub mod backtest;
pub mod bar;
pub mod config_validation;
pub mod decision;
pub mod error;
pub mod evaluator;
pub mod indicator;
pub mod metrics;
pub mod planner;
pub mod portfolio;
pub mod recommendation;
pub mod strategy;
pub mod summary;
pub mod technical;

#[cfg(test)]
pub(crate) mod test_support;
