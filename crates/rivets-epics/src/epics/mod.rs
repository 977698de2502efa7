//! Epic closure eligibility.
//!
//! - [`ContainmentGraph`]: direct parents of an issue, child counts of an epic
//! - [`EligibilityEvaluator`]: open epics annotated with eligibility, and the
//!   single-epic check
//! - [`cascade`]: the caller-driven, one-level-at-a-time closure contract
//!
//! Every operation is a side-effect-free read taking a
//! [`ReadContext`](crate::context::ReadContext).

pub mod cascade;
mod evaluator;
mod graph;
mod queries;

pub use evaluator::EligibilityEvaluator;
pub use graph::ContainmentGraph;
